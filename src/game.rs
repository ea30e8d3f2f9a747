use bevy::prelude::*;

pub mod config;
pub mod fixed_math;
pub mod goals;
pub mod maze;
pub mod motion;
pub mod pathfinding;
pub mod pickups;
pub mod simulation;
pub mod view;

use config::ConfigPlugin;
use simulation::ChasePlugin;
use view::ViewPlugin;

/// Everything the windowed app needs: configuration, the fixed-tick chase and
/// its gizmo rendering. Headless users can add [`ChasePlugin`] alone.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((ConfigPlugin, ChasePlugin, ViewPlugin))
            .insert_resource(ClearColor(Color::BLACK));
    }
}
