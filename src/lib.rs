pub mod game;

// ============================================================================
// Profiling Macros
// ============================================================================

/// Log a message every 300 ticks when the `perf_stats` feature is enabled.
///
/// Without the feature this expands to nothing and the arguments are never
/// evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(tick, "{} waypoints left", chase.path().len());
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % 300 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}
