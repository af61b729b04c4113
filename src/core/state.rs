//! Core domain: game state definitions for the session flow.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    #[default]
    Boot,
    /// A level is loaded and simulating.
    Playing,
    /// The level reported a win or loss; simulation is frozen.
    Ended,
}
