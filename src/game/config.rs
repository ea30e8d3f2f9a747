use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::FixedNum;
use crate::game::maze::{Cell, DEFAULT_LAYOUT};
use crate::game::motion::{ArrivalPolicy, ChaseSettings};
use crate::game::simulation::ChaseStartup;

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Static configuration loaded once at startup. The maze, speeds and seed
/// fix the whole chase; changing them means restarting.
#[derive(Resource, Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct InitialConfig {
    // Simulation
    pub tick_rate: f64,
    pub cell_size: f32,
    pub ghost_speed: f32,
    pub ghost_radius: f32,
    pub pickup_radius: f32,
    pub arrival: ArrivalPolicy,
    /// `None` seeds goal selection from OS entropy.
    pub rng_seed: Option<u64>,
    pub max_replan_attempts: usize,

    // Maze
    pub maze: Vec<String>,
    pub start: Cell,
    pub initial_goal: Cell,
    pub candidates: Vec<Cell>,
}

impl InitialConfig {
    pub fn chase_settings(&self) -> ChaseSettings {
        ChaseSettings {
            maze: self.maze.clone(),
            start: self.start,
            initial_goal: self.initial_goal,
            candidates: self.candidates.clone(),
            cell_size: FixedNum::from_num(self.cell_size),
            speed: FixedNum::from_num(self.ghost_speed),
            radius: FixedNum::from_num(self.ghost_radius),
            arrival: self.arrival,
            seed: self.rng_seed,
            max_replan_attempts: self.max_replan_attempts,
        }
    }
}

impl Default for InitialConfig {
    fn default() -> Self {
        let chase = ChaseSettings::default();
        Self {
            tick_rate: 60.0,
            cell_size: 40.0,
            ghost_speed: 2.0,
            ghost_radius: 16.0,
            pickup_radius: 10.0,
            arrival: chase.arrival,
            rng_seed: None,
            max_replan_attempts: chase.max_replan_attempts,
            maze: DEFAULT_LAYOUT.iter().map(|row| row.to_string()).collect(),
            start: chase.start,
            initial_goal: chase.initial_goal,
            candidates: chase.candidates,
        }
    }
}

/// Drawing options, hot-reloaded from `view_config.ron`. None of this touches
/// the simulation.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug, PartialEq)]
pub struct ViewConfig {
    pub show_path: bool,
    pub wall_color: [f32; 3],
    pub ghost_color: [f32; 3],
    pub pickup_color: [f32; 3],
    pub path_color: [f32; 3],
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_path: false,
            wall_color: [0.0, 0.0, 1.0],
            ghost_color: [1.0, 0.75, 0.8],
            pickup_color: [1.0, 1.0, 1.0],
            path_color: [1.0, 1.0, 0.0],
        }
    }
}

#[derive(Resource)]
pub struct ViewConfigHandle(pub Handle<ViewConfig>);

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<ViewConfig>::new(&["view_config.ron"]))
            .add_systems(
                Startup,
                (load_initial_config.in_set(ChaseStartup::LoadConfig), setup_view_config),
            );
    }
}

/// Read the static configuration synchronously, before the chase is built.
/// A resource inserted beforehand (tests, embedding apps) wins over the file.
fn load_initial_config(mut commands: Commands, existing: Option<Res<InitialConfig>>) {
    if existing.is_some() {
        info!("[CONFIG] InitialConfig already provided, skipping {}", INITIAL_CONFIG_PATH);
        return;
    }

    match std::fs::read_to_string(INITIAL_CONFIG_PATH) {
        Ok(contents) => match ron::from_str::<InitialConfig>(&contents) {
            Ok(config) => {
                info!("[CONFIG] Loaded initial config from {}", INITIAL_CONFIG_PATH);
                commands.insert_resource(config);
            }
            Err(e) => {
                error!("[CONFIG] Failed to parse initial config: {}", e);
                error!("[CONFIG] Using default InitialConfig");
                commands.insert_resource(InitialConfig::default());
            }
        },
        Err(e) => {
            error!("[CONFIG] Failed to read {}: {}", INITIAL_CONFIG_PATH, e);
            error!("[CONFIG] Using default InitialConfig");
            commands.insert_resource(InitialConfig::default());
        }
    }
}

fn setup_view_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("view_config.ron");
    commands.insert_resource(ViewConfigHandle(handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_initial_config_parses() {
        let config: InitialConfig = ron::from_str(include_str!("../../assets/initial_config.ron")).unwrap();
        assert_eq!(config.maze.len(), 10);
        assert_eq!(config.start, Cell::new(1, 1));
        assert_eq!(config.initial_goal, Cell::new(8, 12));
        assert_eq!(config.candidates.len(), 7);
    }

    #[test]
    fn test_shipped_view_config_parses() {
        let config: ViewConfig = ron::from_str(include_str!("../../assets/view_config.ron")).unwrap();
        assert_eq!(config.wall_color, ViewConfig::default().wall_color);
    }

    #[test]
    fn test_default_matches_chase_defaults() {
        let settings = InitialConfig::default().chase_settings();
        let defaults = ChaseSettings::default();
        assert_eq!(settings.maze, defaults.maze);
        assert_eq!(settings.candidates, defaults.candidates);
        assert_eq!(settings.speed, defaults.speed);
        assert_eq!(settings.cell_size, defaults.cell_size);
    }

    #[test]
    fn test_default_survives_ron_round_trip() {
        let config = InitialConfig { rng_seed: Some(42), ..Default::default() };
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: InitialConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
