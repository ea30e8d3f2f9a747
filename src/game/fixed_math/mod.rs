//! Deterministic fixed-point mathematics.
//!
//! Agent positions and velocities use fixed-point numbers so that a per-tick
//! displacement which divides the cell size lands exactly on waypoint centers,
//! and so that two runs with the same seed stay bit-identical.

use fixed::types::I48F16;

pub use vec2::FixedVec2;

mod vec2;

/// Fixed-point number type used throughout the chase simulation.
///
/// I48F16: 48 integer bits, 16 fractional bits (precision ~0.000015).
pub type FixedNum = I48F16;
