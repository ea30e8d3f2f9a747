use std::collections::VecDeque;

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::game::maze::{Cell, InvalidMapError, MazeMap};

/// A walkable cell with its entry cost and cardinal neighbors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridNode {
    pub cell: Cell,
    pub weight: u32,
    /// In-bounds passable neighbors, ordered up, down, left, right.
    pub neighbors: SmallVec<[Cell; 4]>,
}

/// Walkable graph over a maze.
///
/// Built in one pass from a [`MazeMap`]: every passable cell becomes a
/// [`GridNode`] linked to its passable cardinal neighbors, walls become empty
/// slots. There is no diagonal movement and every step costs 1.
///
/// # Immutability
///
/// The graph never changes after [`GridGraph::build`]. A different map means a
/// new graph; search state lives in the search, not on the nodes, so one
/// graph can serve any number of searches.
///
/// # Connectivity
///
/// Construction also flood-fills connected components, so
/// [`GridGraph::connected`] answers reachability in O(1) without searching.
///
/// # Performance
///
/// - **Build:** O(rows × cols)
/// - **Memory:** one optional node and one component label per cell
#[derive(Clone, Debug)]
pub struct GridGraph {
    rows: usize,
    cols: usize,
    nodes: Vec<Option<GridNode>>,
    components: Vec<Option<u32>>,
    component_count: u32,
}

impl GridGraph {
    pub fn build(map: &MazeMap) -> Self {
        let rows = map.rows();
        let cols = map.cols();
        let mut nodes = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for col in 0..cols {
                let cell = Cell::new(row, col);
                let node = map.tile(cell).and_then(|tile| tile.weight()).map(|weight| {
                    let candidates = [
                        (row.wrapping_sub(1), col), // Up
                        (row + 1, col),             // Down
                        (row, col.wrapping_sub(1)), // Left
                        (row, col + 1),             // Right
                    ];
                    let neighbors = candidates
                        .into_iter()
                        .map(|(r, c)| Cell::new(r, c))
                        .filter(|n| map.tile(*n).is_some_and(|t| t.is_passable()))
                        .collect();
                    GridNode { cell, weight, neighbors }
                });
                nodes.push(node);
            }
        }

        let mut graph = Self {
            rows,
            cols,
            nodes,
            components: vec![None; rows * cols],
            component_count: 0,
        };
        graph.label_components();

        debug!(
            "[PATHFINDING] Built {}x{} grid graph: {} walkable cells, {} component(s)",
            rows,
            cols,
            graph.passable_cells().count(),
            graph.component_count
        );
        graph
    }

    /// Parse symbol rows and build in one go.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, InvalidMapError> {
        let map = MazeMap::parse(rows)?;
        Ok(Self::build(&map))
    }

    fn label_components(&mut self) {
        let mut queue = VecDeque::new();
        let mut next_label = 0;

        for start_idx in 0..self.nodes.len() {
            if self.nodes[start_idx].is_none() || self.components[start_idx].is_some() {
                continue;
            }

            self.components[start_idx] = Some(next_label);
            queue.push_back(start_idx);

            while let Some(idx) = queue.pop_front() {
                let Some(node) = &self.nodes[idx] else { continue };
                for &neighbor in &node.neighbors {
                    let n_idx = neighbor.row * self.cols + neighbor.col;
                    if self.components[n_idx].is_none() {
                        self.components[n_idx] = Some(next_label);
                        queue.push_back(n_idx);
                    }
                }
            }

            next_label += 1;
        }

        self.component_count = next_label;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cell slots, walls included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Row-major slot index. Only meaningful for in-bounds cells.
    #[inline]
    pub fn index(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    pub fn node(&self, cell: Cell) -> Option<&GridNode> {
        if !self.contains(cell) {
            return None;
        }
        self.nodes[self.index(cell)].as_ref()
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.node(cell).is_some()
    }

    /// Empty for walls and out-of-bounds cells.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        self.node(cell).map(|node| node.neighbors.as_slice()).unwrap_or(&[])
    }

    pub fn weight(&self, cell: Cell) -> Option<u32> {
        self.node(cell).map(|node| node.weight)
    }

    /// Walkable cells, row-major.
    pub fn passable_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.nodes.iter().flatten().map(|node| node.cell)
    }

    pub fn component(&self, cell: Cell) -> Option<u32> {
        if !self.contains(cell) {
            return None;
        }
        self.components[self.index(cell)]
    }

    pub fn component_count(&self) -> u32 {
        self.component_count
    }

    /// Both cells are walkable and in the same component.
    pub fn connected(&self, a: Cell, b: Cell) -> bool {
        match (self.component(a), self.component(b)) {
            (Some(ca), Some(cb)) => ca == cb,
            _ => false,
        }
    }
}
