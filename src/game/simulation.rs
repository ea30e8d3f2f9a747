use bevy::prelude::*;
use ghostmaze_macros::profile;

use crate::game::config::InitialConfig;
use crate::game::fixed_math::FixedNum;
use crate::game::motion::{ChaseController, Replan};
use crate::game::pickups::Pickups;
use crate::profile_log;

pub struct ChasePlugin;

/// Startup ordering: configuration must exist before the chase is built.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ChaseStartup {
    LoadConfig,
    BuildWorld,
}

#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum ChaseSet {
    Advance, // Arrival, re-planning, movement
    Collect, // Pickup bookkeeping
}

/// Number of fixed ticks simulated so far.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

/// The ghost switched to a new goal.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalChanged(pub Replan);

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickupsEaten {
    pub count: usize,
    pub tick: u64,
}

impl Plugin for ChasePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimTick>()
            .add_message::<GoalChanged>()
            .add_message::<PickupsEaten>()
            .configure_sets(Startup, (ChaseStartup::LoadConfig, ChaseStartup::BuildWorld).chain())
            .configure_sets(FixedUpdate, (ChaseSet::Advance, ChaseSet::Collect).chain())
            .add_systems(Startup, setup_chase.in_set(ChaseStartup::BuildWorld))
            .add_systems(
                FixedUpdate,
                (
                    advance_ghost.in_set(ChaseSet::Advance),
                    (spawn_goal_pickups, collect_pickups).chain().in_set(ChaseSet::Collect),
                )
                    .run_if(resource_exists::<ChaseController>),
            );
    }
}

/// Build the controller from [`InitialConfig`]. An invalid map or an
/// unreachable first goal is fatal.
fn setup_chase(
    mut commands: Commands,
    config: Option<Res<InitialConfig>>,
    mut fixed_time: ResMut<Time<Fixed>>,
    mut exit: MessageWriter<AppExit>,
) {
    let config = match config {
        Some(config) => InitialConfig::clone(&config),
        None => {
            warn!("[CONFIG] No InitialConfig present, using defaults");
            let config = InitialConfig::default();
            commands.insert_resource(config.clone());
            config
        }
    };

    fixed_time.set_timestep_hz(config.tick_rate);
    info!("[CHASE] Tick rate set to {} Hz", config.tick_rate);

    match ChaseController::new(config.chase_settings()) {
        Ok(chase) => {
            let pickups = Pickups::from_markers(
                chase.map(),
                &chase.geometry(),
                FixedNum::from_num(config.pickup_radius),
            );
            info!("[CHASE] Placed {} pickup(s) on markers", pickups.len());
            commands.insert_resource(pickups);
            commands.insert_resource(chase);
        }
        Err(e) => {
            error!("[CHASE] Cannot start chase: {}", e);
            exit.write(AppExit::error());
        }
    }
}

#[profile(500)]
pub fn advance_ghost(
    mut chase: ResMut<ChaseController>,
    mut tick: ResMut<SimTick>,
    mut goal_changes: MessageWriter<GoalChanged>,
) {
    tick.0 += 1;
    let outcome = chase.tick();

    if let Some(replan) = outcome.replan {
        goal_changes.write(GoalChanged(replan));
    }

    profile_log!(
        tick,
        "[CHASE] tick {}: {:?}, {} waypoint(s) left",
        tick.0,
        chase.state(),
        chase.path().len()
    );
}

/// Drop a fresh pickup on each newly chosen goal.
pub fn spawn_goal_pickups(
    mut goal_changes: MessageReader<GoalChanged>,
    chase: Res<ChaseController>,
    mut pickups: ResMut<Pickups>,
) {
    let geometry = chase.geometry();
    for GoalChanged(replan) in goal_changes.read() {
        pickups.spawn_at(replan.goal, &geometry);
    }
}

pub fn collect_pickups(
    chase: Res<ChaseController>,
    tick: Res<SimTick>,
    mut pickups: ResMut<Pickups>,
    mut eaten: MessageWriter<PickupsEaten>,
) {
    let agent = chase.agent();
    let count = pickups.collect(agent.position, agent.radius);
    if count > 0 {
        debug!("[CHASE] Ate {} pickup(s) at tick {}, {} left", count, tick.0, pickups.len());
        eaten.write(PickupsEaten { count, tick: tick.0 });
    }
}
