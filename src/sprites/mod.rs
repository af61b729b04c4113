//! Sprites module: player animation clips and frame playback.

pub mod animation;
pub mod manifest;

#[cfg(test)]
mod tests;

use bevy::prelude::*;

pub use animation::{AnimationStateMachine, ClipTiming};
pub use manifest::PlayerAnimations;

use crate::core::GameState;
use crate::physics::TickSet;

const MANIFEST_PATH: &str = "assets/sprites/player.json";

pub struct SpritesPlugin;

impl Plugin for SpritesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerAnimations>()
            .add_systems(Startup, load_sprite_manifest)
            .add_systems(
                FixedUpdate,
                animation::animate_player
                    .in_set(TickSet::Gameplay)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

/// System to load the sprite manifest at startup.
fn load_sprite_manifest(mut animations: ResMut<PlayerAnimations>, asset_server: Res<AssetServer>) {
    animations.load_from_file(MANIFEST_PATH, &asset_server);
}
