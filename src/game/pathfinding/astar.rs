use std::collections::BinaryHeap;

use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use ghostmaze_macros::profile;
use rustc_hash::FxHashMap;

use crate::game::maze::Cell;
use super::graph::GridGraph;
use super::types::{OpenEntry, Path, PathSearchError, SearchRecord};

/// Expansion count above which a search is reported as unusually expensive.
const HIGH_EXPANSION_WARNING: usize = 4096;

#[inline]
pub(super) fn heuristic(cell: Cell, goal: Cell) -> u32 {
    cell.manhattan(goal)
}

fn reconstruct_path(records: &FxHashMap<Cell, SearchRecord>, mut current: Cell) -> Path {
    let mut cells = vec![current];

    while let Some(prev) = records.get(&current).and_then(|record| record.parent) {
        current = prev;
        cells.push(current);
    }

    cells.reverse();
    Path::from_cells(cells)
}

/// A* shortest path from `start` to `goal`, both inclusive.
///
/// Uses the Manhattan heuristic, which never overestimates on a 4-connected
/// unit-cost grid, so the returned path has the minimum number of steps.
/// Frontier ties break on lower `h`, then on insertion order, so identical
/// inputs always give the identical path.
///
/// `start == goal` yields the single-cell path. An unreachable goal is an
/// error, never an empty path.
#[profile(500)]
pub fn search(graph: &GridGraph, start: Cell, goal: Cell) -> Result<Path, PathSearchError> {
    for cell in [start, goal] {
        if !graph.contains(cell) {
            return Err(PathSearchError::OutOfBounds(cell));
        }
        if !graph.is_passable(cell) {
            return Err(PathSearchError::Impassable(cell));
        }
    }

    if start == goal {
        return Ok(Path::from_cells([start]));
    }

    let mut open_set = BinaryHeap::new();
    let mut records: FxHashMap<Cell, SearchRecord> = FxHashMap::default();
    let mut closed = FixedBitSet::with_capacity(graph.len());
    let mut seq: u64 = 0;
    let mut expanded = 0usize;

    let start_record = SearchRecord { g: 0, h: heuristic(start, goal), parent: None };
    records.insert(start, start_record);
    open_set.push(OpenEntry { f: start_record.f(), h: start_record.h, seq, cell: start });

    while let Some(OpenEntry { cell: current, .. }) = open_set.pop() {
        let current_idx = graph.index(current);
        // Superseded duplicate of an already expanded cell.
        if closed.contains(current_idx) {
            continue;
        }

        if current == goal {
            if expanded > HIGH_EXPANSION_WARNING {
                warn!("[PATHFINDING] A* expanded {} nodes for {} -> {} (high!)", expanded, start, goal);
            }
            debug!("[PATHFINDING] A* {} -> {}: expanded {} nodes", start, goal, expanded);
            return Ok(reconstruct_path(&records, current));
        }

        closed.insert(current_idx);
        expanded += 1;

        let current_g = records[&current].g;

        for &neighbor in graph.neighbors(current) {
            if closed.contains(graph.index(neighbor)) {
                continue;
            }
            let Some(weight) = graph.weight(neighbor) else {
                continue;
            };

            let tentative_g = current_g + weight;
            let improves = records.get(&neighbor).map_or(true, |record| tentative_g < record.g);

            if improves {
                let record = SearchRecord { g: tentative_g, h: heuristic(neighbor, goal), parent: Some(current) };
                records.insert(neighbor, record);
                seq += 1;
                open_set.push(OpenEntry { f: record.f(), h: record.h, seq, cell: neighbor });
            }
        }
    }

    debug!("[PATHFINDING] A* {} -> {}: frontier exhausted after {} nodes", start, goal, expanded);
    Err(PathSearchError::NoPathFound { start, goal })
}
