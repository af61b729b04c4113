//! Movement domain: player locomotion on top of the rigid-body world.

mod components;
mod controller;
mod cues;
mod resources;
mod sensor;
mod systems;


pub use components::{
    Control, ControlEvent, Facing, Hitbox, LocomotionState, MovementCue, Player,
};
pub use controller::MovementController;
pub use cues::silence_locomotion;
pub use resources::{MovementTuning, PendingControls};
pub use sensor::{ActorBody, GroundHit, GroundSensor, Surface};

use bevy::prelude::*;

use crate::core::GameState;
use crate::physics::TickSet;
use systems::{apply_controls, pre_step_controllers, read_back_controllers, read_controls};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MovementTuning>()
            .init_resource::<PendingControls>()
            .add_systems(Update, read_controls)
            .add_systems(
                FixedUpdate,
                (
                    read_back_controllers.in_set(TickSet::ReadBack),
                    apply_controls.in_set(TickSet::Control),
                    pre_step_controllers.in_set(TickSet::BeforeStep),
                )
                    .run_if(in_state(GameState::Playing)),
            );
    }
}
