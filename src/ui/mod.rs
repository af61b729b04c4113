//! UI domain: HUD text and the end-of-fight overlay.

mod end_screen;
mod hud;


use bevy::prelude::*;

use crate::core::GameState;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, hud::spawn_hud)
            .add_systems(Update, hud::update_hud)
            .add_systems(OnEnter(GameState::Ended), end_screen::spawn_end_screen)
            .add_systems(OnExit(GameState::Ended), end_screen::cleanup_end_screen);
    }
}
