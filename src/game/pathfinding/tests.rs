/// Tests for pathfinding correctness
///
/// These check the search against a brute-force BFS on random grids, and pin
/// down the edge cases the motion controller relies on (zero-step paths,
/// explicit failure for unreachable goals, deterministic tie-breaking).

use std::collections::VecDeque;

use super::*;
use crate::game::maze::{Cell, DEFAULT_LAYOUT};

/// Reference step count via plain breadth-first search.
fn bfs_steps(graph: &GridGraph, start: Cell, goal: Cell) -> Option<usize> {
    let mut dist = vec![usize::MAX; graph.len()];
    let mut queue = VecDeque::new();
    dist[graph.index(start)] = 0;
    queue.push_back(start);

    while let Some(cell) = queue.pop_front() {
        let d = dist[graph.index(cell)];
        if cell == goal {
            return Some(d);
        }
        for &n in graph.neighbors(cell) {
            let idx = graph.index(n);
            if dist[idx] == usize::MAX {
                dist[idx] = d + 1;
                queue.push_back(n);
            }
        }
    }
    None
}

/// Random rectangular map with roughly `wall_percent` walls.
fn random_rows(rng: &mut fastrand::Rng, rows: usize, cols: usize, wall_percent: u8) -> Vec<String> {
    (0..rows)
        .map(|_| {
            (0..cols)
                .map(|_| if rng.u8(0..100) < wall_percent { '-' } else { ' ' })
                .collect()
        })
        .collect()
}

fn assert_walkable_chain(graph: &GridGraph, path: &Path) {
    let cells = path.to_vec();
    for cell in &cells {
        assert!(graph.is_passable(*cell), "Path crosses wall at {}", cell);
    }
    for pair in cells.windows(2) {
        assert!(
            pair[0].is_cardinal_neighbor(pair[1]),
            "Path jumps from {} to {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn test_sample_maze_end_to_end() {
    let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let start = Cell::new(1, 1);
    let goal = Cell::new(8, 12);

    let path = search(&graph, start, goal).expect("Sample goal should be reachable");

    assert!(!path.is_empty());
    assert_eq!(path.front(), Some(start));
    assert_eq!(path.back(), Some(goal));
    assert_eq!(path.steps(), 18, "Shortest route in the sample maze is 18 steps");
    assert_walkable_chain(&graph, &path);
}

#[test]
fn test_start_equals_goal_is_zero_steps() {
    let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let cell = Cell::new(1, 5);

    let path = search(&graph, cell, cell).expect("Already at goal is not a failure");
    assert_eq!(path.to_vec(), vec![cell]);
    assert_eq!(path.steps(), 0);
}

#[test]
fn test_search_is_deterministic() {
    let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let rebuilt = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let start = Cell::new(8, 1);
    let goal = Cell::new(1, 12);

    let first = search(&graph, start, goal).unwrap();
    for _ in 0..10 {
        assert_eq!(search(&graph, start, goal).unwrap(), first);
    }
    assert_eq!(search(&rebuilt, start, goal).unwrap(), first);
}

#[test]
fn test_open_room_tie_breaking_is_stable() {
    // Many equal-cost routes: the result must still be identical every time.
    let rows = ["       "; 7];
    let graph = GridGraph::from_rows(&rows).unwrap();
    let first = search(&graph, Cell::new(0, 0), Cell::new(6, 6)).unwrap();

    assert_eq!(first.steps(), 12);
    assert_walkable_chain(&graph, &first);
    for _ in 0..10 {
        assert_eq!(search(&graph, Cell::new(0, 0), Cell::new(6, 6)).unwrap(), first);
    }
}

#[test]
fn test_searches_do_not_share_state() {
    let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let a = search(&graph, Cell::new(1, 1), Cell::new(8, 8)).unwrap();
    let _ = search(&graph, Cell::new(8, 12), Cell::new(1, 8)).unwrap();
    let _ = search(&graph, Cell::new(1, 12), Cell::new(8, 1)).unwrap();
    assert_eq!(search(&graph, Cell::new(1, 1), Cell::new(8, 8)).unwrap(), a);
}

#[test]
fn test_wall_ring_is_unreachable() {
    let rows = [
        "         ",
        " ------- ",
        " -     - ",
        " -     - ",
        " -     - ",
        " ------- ",
        "         ",
    ];
    let graph = GridGraph::from_rows(&rows).unwrap();
    let start = Cell::new(0, 0);
    let goal = Cell::new(3, 4);

    let result = search(&graph, start, goal);
    assert_eq!(result, Err(PathSearchError::NoPathFound { start, goal }));
    assert!(!graph.connected(start, goal));
}

#[test]
fn test_invalid_endpoints_are_reported() {
    let graph = GridGraph::from_rows(&DEFAULT_LAYOUT).unwrap();
    let open = Cell::new(1, 1);

    assert_eq!(
        search(&graph, Cell::new(0, 0), open),
        Err(PathSearchError::Impassable(Cell::new(0, 0)))
    );
    assert_eq!(
        search(&graph, open, Cell::new(3, 40)),
        Err(PathSearchError::OutOfBounds(Cell::new(3, 40)))
    );
}

#[test]
fn test_path_length_matches_bfs_on_random_grids() {
    let mut rng = fastrand::Rng::with_seed(0x5eed);
    let mut compared = 0;

    for _ in 0..300 {
        let rows = rng.usize(1..12);
        let cols = rng.usize(1..12);
        let map = random_rows(&mut rng, rows, cols, 30);
        let graph = GridGraph::from_rows(&map).unwrap();

        let walkable: Vec<Cell> = graph.passable_cells().collect();
        if walkable.is_empty() {
            continue;
        }
        let start = walkable[rng.usize(0..walkable.len())];
        let goal = walkable[rng.usize(0..walkable.len())];

        match (search(&graph, start, goal), bfs_steps(&graph, start, goal)) {
            (Ok(path), Some(expected)) => {
                assert_eq!(path.steps(), expected, "Suboptimal path {} -> {} in {:?}", start, goal, map);
                assert_eq!(path.front(), Some(start));
                assert_eq!(path.back(), Some(goal));
                assert_walkable_chain(&graph, &path);
                compared += 1;
            }
            (Err(PathSearchError::NoPathFound { .. }), None) => {
                assert!(!graph.connected(start, goal));
            }
            (result, expected) => {
                panic!("Search {:?} disagrees with BFS {:?} for {} -> {} in {:?}", result, expected, start, goal, map);
            }
        }
    }

    assert!(compared > 100, "Too few reachable pairs exercised: {}", compared);
}

#[test]
fn test_graph_only_links_adjacent_walkable_cells() {
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..100 {
        let rows = rng.usize(1..15);
        let cols = rng.usize(1..15);
        let map = random_rows(&mut rng, rows, cols, 40);
        let graph = GridGraph::from_rows(&map).unwrap();

        for cell in graph.passable_cells() {
            let neighbors = graph.neighbors(cell);
            assert!(neighbors.len() <= 4);
            for &n in neighbors {
                assert!(cell.is_cardinal_neighbor(n), "{} linked to non-adjacent {}", cell, n);
                assert!(graph.is_passable(n), "{} linked to wall {}", cell, n);
                assert!(graph.neighbors(n).contains(&cell), "Adjacency {} -> {} is one-way", cell, n);
            }
        }
    }
}
