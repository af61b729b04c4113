//! Combat domain: player gun, bullets, hit resolution and the enemy AI.

pub mod ai;
mod components;
mod resources;
mod systems;


pub use ai::{EnemyAi, FlightPattern};
pub use components::{Enemy, Gun, Health, Projectile, Projectiles, aim_angle, muzzle_shot};
pub use resources::{CombatRng, CombatTuning, EnemyTuning, GunInput};
pub use systems::{ShotReport, operate_gun, strike, strike_with_chance};

use bevy::prelude::*;

use crate::core::{GameState, RunConfig};
use crate::physics::TickSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatTuning>()
            .init_resource::<EnemyTuning>()
            .init_resource::<GunInput>()
            .add_systems(Startup, seed_combat_rng)
            .add_systems(
                Update,
                (systems::gather_gun_input, systems::draw_projectiles)
                    .run_if(in_state(GameState::Playing)),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::fire_player_gun,
                    ai::enemy::run_enemy_ai,
                    systems::advance_projectiles,
                    systems::resolve_projectile_hits,
                )
                    .chain()
                    .in_set(TickSet::Gameplay)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn seed_combat_rng(mut commands: Commands, config: Res<RunConfig>) {
    info!("Combat RNG seed: {}", config.seed);
    commands.insert_resource(CombatRng::from_seed(config.seed));
}
