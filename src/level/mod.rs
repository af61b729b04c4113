//! Level domain: grid layouts, level behaviors and level lifecycle.

mod behavior;
mod grid;
mod levels;
mod resources;
mod spawn;
mod systems;

#[cfg(test)]
mod tests;

pub use behavior::{
    ActorStats, LevelBehavior, LevelContext, LevelDirective, LevelEvent, Outcome,
};
pub use grid::{
    BlockKind, Cell, CellKind, LevelGrid, LevelLoadError, MAX_ROWS, TILE_SIZE, cell_center,
    load_level,
};
pub use levels::{BossLevel, CREDITS_LEVEL, ParkourLevel, PlatformLevel, level_behavior};
pub use resources::{ActiveLevel, LevelDirectives, LevelTuning};
pub use spawn::{LevelBodies, LevelEntity, build_bodies};
pub use systems::Crumbling;

use bevy::prelude::*;

use crate::core::GameState;
use crate::physics::TickSet;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelTuning>()
            .init_resource::<ActiveLevel>()
            .init_resource::<LevelDirectives>()
            .add_message::<LevelEvent>()
            .add_systems(
                Update,
                (
                    systems::begin_requested_level,
                    systems::read_level_keys,
                    systems::dispatch_level_events,
                    systems::apply_level_directives,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    systems::track_block_contacts,
                    systems::tick_crumbling_blocks,
                    systems::run_level_tick,
                )
                    .chain()
                    .in_set(TickSet::Gameplay)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
