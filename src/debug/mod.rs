//! Debug tooling, built with the `dev-tools` feature.
//!
//! - P logs player and enemy health, the game-over flag and the level
//! - F3 toggles hitbox and ground probe gizmos

mod state;
mod systems;


pub use state::DebugState;

use bevy::prelude::*;

pub struct DebugPlugin;

impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugState>().add_systems(
            Update,
            (
                systems::log_stats_hotkey,
                systems::toggle_gizmos,
                systems::draw_debug_gizmos,
            ),
        );
    }
}
