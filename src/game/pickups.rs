use bevy::prelude::*;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::maze::{Cell, CellGeometry, MazeMap, Tile};

/// Collectible points the ghost eats on contact.
#[derive(Resource, Debug, Clone, Default)]
pub struct Pickups {
    positions: Vec<FixedVec2>,
    radius: FixedNum,
}

impl Pickups {
    pub fn new(radius: FixedNum) -> Self {
        Self { positions: Vec::new(), radius }
    }

    /// One pickup on every marker tile of the map.
    pub fn from_markers(map: &MazeMap, geometry: &CellGeometry, radius: FixedNum) -> Self {
        let positions = map.cells_of(Tile::Marker).map(|cell| geometry.center(cell)).collect();
        Self { positions, radius }
    }

    pub fn spawn(&mut self, position: FixedVec2) {
        self.positions.push(position);
    }

    pub fn spawn_at(&mut self, cell: Cell, geometry: &CellGeometry) {
        self.spawn(geometry.center(cell));
    }

    /// Remove every pickup overlapping a circle of `radius` at `position`.
    /// Returns how many were eaten.
    pub fn collect(&mut self, position: FixedVec2, radius: FixedNum) -> usize {
        let reach = radius + self.radius;
        let reach_sq = reach * reach;
        let before = self.positions.len();

        for i in (0..self.positions.len()).rev() {
            if (self.positions[i] - position).length_squared() < reach_sq {
                self.positions.remove(i);
            }
        }

        before - self.positions.len()
    }

    pub fn positions(&self) -> &[FixedVec2] {
        &self.positions
    }

    pub fn radius(&self) -> FixedNum {
        self.radius
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
