//! Animation state machine and playback.
//!
//! Maps the locomotion state to a looping clip and advances frames on the
//! fixed tick. Dashing has no clip of its own: the sprite freezes on whatever
//! frame the pre-dash state was showing.

use std::collections::HashMap;

use bevy::prelude::*;

use super::manifest::PlayerAnimations;
use crate::movement::{Facing, LocomotionState, MovementController};
use crate::physics::TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipTiming {
    pub frame_count: usize,
    pub delay_ms: f32,
}

#[derive(Component, Debug, Clone)]
pub struct AnimationStateMachine {
    clips: HashMap<LocomotionState, ClipTiming>,
    displayed: LocomotionState,
    frame: usize,
    timer_ms: f32,
}

impl AnimationStateMachine {
    pub fn new(clips: HashMap<LocomotionState, ClipTiming>) -> Self {
        Self {
            clips,
            displayed: LocomotionState::Idle,
            frame: 0,
            timer_ms: 0.0,
        }
    }

    /// Clip timings from the loaded frames. States without frames never advance.
    pub fn from_animations(animations: &PlayerAnimations) -> Self {
        let clips = animations
            .frames
            .iter()
            .map(|(state, frames)| {
                let delay_ms = animations.delays.get(state).copied().unwrap_or(0.0);
                (
                    *state,
                    ClipTiming {
                        frame_count: frames.len(),
                        delay_ms,
                    },
                )
            })
            .collect();
        Self::new(clips)
    }

    /// The state whose clip is on screen. Never `Dashing`.
    pub fn displayed_state(&self) -> LocomotionState {
        self.displayed
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn update(&mut self, state: LocomotionState, elapsed_ms: f32) {
        if state == LocomotionState::Dashing {
            return;
        }

        if state != self.displayed {
            self.displayed = state;
            self.frame = 0;
            self.timer_ms = 0.0;
        }

        let Some(clip) = self.clips.get(&state) else {
            return;
        };
        if clip.frame_count == 0 {
            return;
        }

        self.timer_ms += elapsed_ms;
        if self.timer_ms >= clip.delay_ms {
            self.timer_ms = 0.0;
            self.frame = (self.frame + 1) % clip.frame_count;
        }
    }
}

/// Advance the player's animation one tick and push the frame to its sprite.
pub(crate) fn animate_player(
    animations: Res<PlayerAnimations>,
    mut query: Query<(&MovementController, &mut AnimationStateMachine, &mut Sprite)>,
) {
    for (controller, mut machine, mut sprite) in &mut query {
        machine.update(controller.state, TICK_MS);
        sprite.flip_x = controller.facing == Facing::Left;

        if let Some(image) = animations.frame(machine.displayed_state(), machine.frame()) {
            sprite.image = image;
        }
    }
}
