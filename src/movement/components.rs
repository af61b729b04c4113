//! Movement domain: locomotion vocabulary shared by controller, animation and audio.

use bevy::prelude::*;
use serde::Deserialize;

#[derive(Component, Debug)]
pub struct Player;

/// Collision box half extents in pixels.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub half_extents: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    Jumping,
    Falling,
    Sprint,
    Dashing,
}

impl LocomotionState {
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }
}

/// Discrete locomotion controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    /// Held to walk instead of run.
    WalkModifier,
    Jump,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlEvent {
    pub control: Control,
    pub pressed: bool,
}

impl ControlEvent {
    pub fn press(control: Control) -> Self {
        Self {
            control,
            pressed: true,
        }
    }

    pub fn release(control: Control) -> Self {
        Self {
            control,
            pressed: false,
        }
    }
}

/// Locomotion moments other domains react to (sound effects).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementCue {
    Jumped,
    DashStarted,
    DashEnded,
    Landed,
}
