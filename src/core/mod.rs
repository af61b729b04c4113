//! Core domain: session context, game state and camera.

mod resources;
mod state;
mod systems;


pub use resources::{RunConfig, SessionContext, Viewport};
pub use state::GameState;

use bevy::prelude::*;

use systems::{boot_first_level, exit_when_stopped, handle_quit_key, setup_camera};

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<SessionContext>()
            .init_resource::<Viewport>()
            .init_resource::<RunConfig>()
            .add_systems(Startup, (setup_camera, boot_first_level))
            .add_systems(Update, (handle_quit_key, exit_when_stopped).chain());
    }
}
