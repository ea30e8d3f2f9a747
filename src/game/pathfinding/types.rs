use std::cmp::Ordering;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::maze::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathSearchError {
    #[error("no path from {start} to {goal}")]
    NoPathFound { start: Cell, goal: Cell },
    #[error("cell {0} is outside the grid")]
    OutOfBounds(Cell),
    #[error("cell {0} is a wall")]
    Impassable(Cell),
}

/// Ordered cells from start to goal, both inclusive.
///
/// A search whose start equals its goal yields a single-cell path with zero
/// steps. Consumers pop from the front as waypoints are reached.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    cells: VecDeque<Cell>,
}

impl Path {
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Self {
        Self { cells: cells.into_iter().collect() }
    }

    pub fn front(&self) -> Option<Cell> {
        self.cells.front().copied()
    }

    pub fn back(&self) -> Option<Cell> {
        self.cells.back().copied()
    }

    pub fn pop_front(&mut self) -> Option<Cell> {
        self.cells.pop_front()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Moves needed to walk the remaining cells.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }
}

/// Per-search bookkeeping for one cell. Never stored on the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct SearchRecord {
    pub g: u32,
    pub h: u32,
    pub parent: Option<Cell>,
}

impl SearchRecord {
    #[inline]
    pub fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Open-set entry. `BinaryHeap` is a max-heap, so the ordering is reversed:
/// lowest `f` first, then lowest `h`, then earliest insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct OpenEntry {
    pub f: u32,
    pub h: u32,
    pub seq: u64,
    pub cell: Cell,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
