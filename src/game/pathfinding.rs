//! Grid pathfinding for the chase.
//!
//! # Architecture
//!
//! 1. **Graph build:** [`GridGraph::build`] turns a [`MazeMap`](crate::game::maze::MazeMap)
//!    into walkable nodes with cardinal adjacency and connected-component labels.
//! 2. **Search:** [`search`] runs A* over the graph and returns a [`Path`] of cells.
//!
//! Search bookkeeping (g, h, parent, closed set) lives in per-call structures
//! and is dropped when the call returns, so repeated searches over the same
//! graph never see each other's state.
//!
//! # Example
//!
//! ```rust
//! use ghostmaze::game::maze::{Cell, DEFAULT_LAYOUT};
//! use ghostmaze::game::pathfinding::{search, GridGraph};
//!
//! let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
//! let path = search(&graph, Cell::new(1, 1), Cell::new(8, 12)).unwrap();
//! assert_eq!(path.front(), Some(Cell::new(1, 1)));
//! assert_eq!(path.back(), Some(Cell::new(8, 12)));
//! ```

mod astar;
mod graph;
mod types;

pub use astar::search;
pub use graph::{GridGraph, GridNode};
pub use types::{Path, PathSearchError};

#[cfg(test)]
mod tests;
