use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::goals::GoalPicker;
use crate::game::maze::{Cell, CellGeometry, InvalidMapError, MazeMap, DEFAULT_LAYOUT};
use crate::game::pathfinding::{search, GridGraph, Path, PathSearchError};

/// How the controller decides the agent has reached a waypoint center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalPolicy {
    /// Position equals the center on both axes. Only terminates when the
    /// per-tick speed divides the distance between centers.
    Exact,
    /// Within `speed / 2` of the center on both axes; the position is then
    /// snapped onto the center.
    #[default]
    Threshold,
}

impl ArrivalPolicy {
    /// Per-axis slack at which an axis counts as aligned.
    pub fn tolerance(self, speed: FixedNum) -> FixedNum {
        match self {
            ArrivalPolicy::Exact => FixedNum::ZERO,
            ArrivalPolicy::Threshold => speed / FixedNum::from_num(2),
        }
    }

    pub fn reached(self, position: FixedVec2, target: FixedVec2, speed: FixedNum) -> bool {
        (target - position).max_axis_abs() <= self.tolerance(speed)
    }
}

/// The chasing ghost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    pub position: FixedVec2,
    /// Displacement applied on the current tick. Recomputed from zero every tick.
    pub velocity: FixedVec2,
    /// Per-tick displacement along each moving axis.
    pub speed: FixedNum,
    pub radius: FixedNum,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionState {
    /// Walking a non-empty path.
    #[default]
    Following,
    /// Last waypoint reached; a new goal has not been requested yet.
    Arrived,
    /// Looking for a new goal. Persists while every candidate is unreachable.
    Seeking,
}

#[derive(Debug, Error)]
pub enum ChaseError {
    #[error(transparent)]
    InvalidMap(#[from] InvalidMapError),
    #[error("initial path search failed: {0}")]
    InitialSearch(#[from] PathSearchError),
    #[error("agent speed must be positive, got {0}")]
    InvalidSpeed(FixedNum),
}

/// Everything needed to set up a chase.
#[derive(Clone, Debug)]
pub struct ChaseSettings {
    pub maze: Vec<String>,
    pub start: Cell,
    pub initial_goal: Cell,
    pub candidates: Vec<Cell>,
    pub cell_size: FixedNum,
    pub speed: FixedNum,
    pub radius: FixedNum,
    pub arrival: ArrivalPolicy,
    pub seed: Option<u64>,
    /// Distinct goals tried per re-plan before giving up until the next tick.
    pub max_replan_attempts: usize,
}

impl Default for ChaseSettings {
    fn default() -> Self {
        Self {
            maze: DEFAULT_LAYOUT.iter().map(|row| row.to_string()).collect(),
            start: Cell::new(1, 1),
            initial_goal: Cell::new(8, 12),
            candidates: vec![
                Cell::new(1, 1),
                Cell::new(1, 5),
                Cell::new(1, 8),
                Cell::new(1, 12),
                Cell::new(8, 12),
                Cell::new(8, 8),
                Cell::new(8, 1),
            ],
            cell_size: FixedNum::from_num(40),
            speed: FixedNum::from_num(2),
            radius: FixedNum::from_num(16),
            arrival: ArrivalPolicy::Threshold,
            seed: None,
            max_replan_attempts: 4,
        }
    }
}

/// A goal transition: the path that was just searched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replan {
    pub from: Cell,
    pub goal: Cell,
    pub goal_index: usize,
    pub steps: usize,
}

/// What happened during one [`ChaseController::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub waypoints_reached: usize,
    pub replan: Option<Replan>,
}

/// Drives the ghost along its path and re-plans when the path runs out.
///
/// Owns the maze, the current graph, the path and the agent. An external
/// driver (the `FixedUpdate` schedule) calls [`tick`](Self::tick) once per
/// frame and nothing else mutates the agent.
///
/// # Per tick
///
/// 1. **Arrival:** while the agent sits on the front waypoint, pop it. An
///    emptied path triggers a re-plan in the same tick: pick a goal that is
///    not the previous one, rebuild the graph, search from the cell just
///    reached.
/// 2. **Steering:** zero the velocity, then on each axis independently move
///    `±speed` toward the front waypoint's center, or 0 if aligned.
/// 3. **Integration:** `position += velocity`.
///
/// # Failure handling
///
/// An unreachable goal is logged and another candidate is drawn, up to
/// `max_replan_attempts`. If none works the agent stays put in
/// [`MotionState::Seeking`] and the next tick tries again.
#[derive(Resource, Debug, Clone)]
pub struct ChaseController {
    map: MazeMap,
    graph: GridGraph,
    geometry: CellGeometry,
    agent: Agent,
    path: Path,
    state: MotionState,
    goal: Cell,
    goal_index: Option<usize>,
    last_reached: Cell,
    picker: GoalPicker,
    arrival: ArrivalPolicy,
    max_replan_attempts: usize,
    tick_count: u64,
}

impl ChaseController {
    pub fn new(settings: ChaseSettings) -> Result<Self, ChaseError> {
        if settings.speed <= FixedNum::ZERO {
            return Err(ChaseError::InvalidSpeed(settings.speed));
        }

        let map = MazeMap::parse(&settings.maze)?;
        let graph = GridGraph::build(&map);
        let path = search(&graph, settings.start, settings.initial_goal)?;
        let geometry = CellGeometry::new(settings.cell_size);

        let mut picker = GoalPicker::new(settings.candidates, settings.seed);
        let goal_index = picker.index_of(settings.initial_goal);
        if let Some(index) = goal_index {
            picker.mark_last(index);
        }

        info!(
            "[CHASE] {}x{} maze, ghost at {} heading to {} ({} steps), {} goal candidates",
            map.rows(),
            map.cols(),
            settings.start,
            settings.initial_goal,
            path.steps(),
            picker.candidates().len()
        );

        Ok(Self {
            agent: Agent {
                position: geometry.center(settings.start),
                velocity: FixedVec2::ZERO,
                speed: settings.speed,
                radius: settings.radius,
            },
            map,
            graph,
            geometry,
            path,
            state: MotionState::Following,
            goal: settings.initial_goal,
            goal_index,
            last_reached: settings.start,
            picker,
            arrival: settings.arrival,
            max_replan_attempts: settings.max_replan_attempts.max(1),
            tick_count: 0,
        })
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_count += 1;
        let mut outcome = TickOutcome::default();
        let speed = self.agent.speed;

        loop {
            match self.path.front() {
                Some(next) => {
                    let center = self.geometry.center(next);
                    if !self.arrival.reached(self.agent.position, center, speed) {
                        break;
                    }
                    self.agent.position = center;
                    self.path.pop_front();
                    self.last_reached = next;
                    outcome.waypoints_reached += 1;
                    if self.path.is_empty() {
                        self.state = MotionState::Arrived;
                    }
                }
                // One goal transition per tick, so a zero-step path cannot spin.
                None if outcome.replan.is_some() => break,
                None => {
                    self.state = MotionState::Seeking;
                    match self.replan() {
                        Some(replan) => outcome.replan = Some(replan),
                        None => break,
                    }
                }
            }
        }

        self.agent.velocity = FixedVec2::ZERO;
        if let Some(next) = self.path.front() {
            self.state = MotionState::Following;
            let delta = self.geometry.center(next) - self.agent.position;
            let tolerance = self.arrival.tolerance(speed);
            self.agent.velocity = FixedVec2::new(
                axis_velocity(delta.x, speed, tolerance),
                axis_velocity(delta.y, speed, tolerance),
            );
        }
        self.agent.position += self.agent.velocity;

        outcome
    }

    /// Choose a new goal and search a path to it from the last reached cell.
    fn replan(&mut self) -> Option<Replan> {
        let from = self.last_reached;
        // Full rebuild on every goal transition.
        self.graph = GridGraph::build(&self.map);

        let mut rejected: Vec<usize> = self.goal_index.into_iter().collect();
        for _ in 0..self.max_replan_attempts {
            let Some((goal_index, goal)) = self.picker.pick_excluding(&rejected) else {
                warn!("[CHASE] No goal candidate left to try from {}", from);
                break;
            };

            if !self.graph.connected(from, goal) {
                warn!("[CHASE] Goal {} (#{}) is unreachable from {}, redrawing", goal, goal_index, from);
                rejected.push(goal_index);
                continue;
            }

            match search(&self.graph, from, goal) {
                Ok(path) => {
                    let steps = path.steps();
                    info!("[CHASE] Re-planned {} -> {} (#{}): {} steps", from, goal, goal_index, steps);
                    self.path = path;
                    self.goal = goal;
                    self.goal_index = Some(goal_index);
                    self.state = MotionState::Following;
                    return Some(Replan { from, goal, goal_index, steps });
                }
                Err(err) => {
                    warn!("[CHASE] Search to goal #{} failed: {}", goal_index, err);
                    rejected.push(goal_index);
                }
            }
        }

        // Keep the previous goal excluded next time.
        if let Some(index) = self.goal_index {
            self.picker.mark_last(index);
        }
        warn!("[CHASE] No reachable goal from {}, holding position", from);
        None
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn goal_index(&self) -> Option<usize> {
        self.goal_index
    }

    /// Cell of the most recently reached waypoint.
    pub fn last_reached(&self) -> Cell {
        self.last_reached
    }

    pub fn graph(&self) -> &GridGraph {
        &self.graph
    }

    pub fn map(&self) -> &MazeMap {
        &self.map
    }

    pub fn geometry(&self) -> CellGeometry {
        self.geometry
    }

    pub fn candidates(&self) -> &[Cell] {
        self.picker.candidates()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

fn axis_velocity(delta: FixedNum, speed: FixedNum, tolerance: FixedNum) -> FixedNum {
    if delta > tolerance {
        speed
    } else if delta < -tolerance {
        -speed
    } else {
        FixedNum::ZERO
    }
}
