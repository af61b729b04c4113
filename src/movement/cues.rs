//! Movement domain: sound cues for locomotion moments.

use super::components::{LocomotionState, MovementCue};
use crate::audio::SoundPlayer;
use crate::core::SessionContext;

const EFFECT_VOLUME: f32 = 0.6;
const FOOTSTEP_VOLUME: f32 = 0.35;

pub fn play_cue(cue: MovementCue, session: &mut SessionContext, sounds: &mut impl SoundPlayer) {
    match cue {
        MovementCue::Jumped => sounds.play_sound("jump", false, EFFECT_VOLUME),
        MovementCue::DashStarted => {
            if !session.dash_sound_playing {
                sounds.play_sound("dash", false, EFFECT_VOLUME);
                session.dash_sound_playing = true;
            }
        }
        MovementCue::DashEnded => session.dash_sound_playing = false,
        MovementCue::Landed => {}
    }
}

/// Keep the looping footstep sound in step with the locomotion state.
pub fn update_footsteps(
    state: LocomotionState,
    session: &mut SessionContext,
    sounds: &mut impl SoundPlayer,
) {
    let moving = matches!(state, LocomotionState::Walking | LocomotionState::Sprint);
    if moving && !session.walking_sound_playing {
        sounds.play_sound("walk", true, FOOTSTEP_VOLUME);
        session.walking_sound_playing = true;
    } else if !moving && session.walking_sound_playing {
        sounds.stop_sound("walk");
        session.walking_sound_playing = false;
    }
}

/// Stop the footstep loop and forget the dash sound when the level stops
/// simulating.
pub fn silence_locomotion(session: &mut SessionContext, sounds: &mut impl SoundPlayer) {
    sounds.stop_sound("walk");
    session.walking_sound_playing = false;
    session.dash_sound_playing = false;
}
