use std::collections::HashMap;

use super::animation::{AnimationStateMachine, ClipTiming};
use super::manifest::ManifestJson;
use crate::movement::LocomotionState;

fn machine() -> AnimationStateMachine {
    let mut clips = HashMap::new();
    clips.insert(
        LocomotionState::Idle,
        ClipTiming {
            frame_count: 4,
            delay_ms: 150.0,
        },
    );
    clips.insert(
        LocomotionState::Walking,
        ClipTiming {
            frame_count: 6,
            delay_ms: 100.0,
        },
    );
    clips.insert(
        LocomotionState::Jumping,
        ClipTiming {
            frame_count: 0,
            delay_ms: 200.0,
        },
    );
    AnimationStateMachine::new(clips)
}

// ---- frame advance ----

#[test]
fn test_frame_advances_after_delay() {
    let mut anim = machine();
    anim.update(LocomotionState::Walking, 50.0);
    assert_eq!(anim.frame(), 0);
    anim.update(LocomotionState::Walking, 50.0);
    assert_eq!(anim.frame(), 1);
}

#[test]
fn test_frame_wraps_modulo_count() {
    let mut anim = machine();
    for _ in 0..4 {
        anim.update(LocomotionState::Idle, 150.0);
    }
    assert_eq!(anim.frame(), 0);
    anim.update(LocomotionState::Idle, 150.0);
    assert_eq!(anim.frame(), 1);
}

#[test]
fn test_frame_stays_below_count() {
    let mut anim = machine();
    for _ in 0..100 {
        anim.update(LocomotionState::Walking, 16.7);
        assert!(anim.frame() < 6);
    }
}

// ---- state changes ----

#[test]
fn test_state_change_resets_frame_and_timer() {
    let mut anim = machine();
    anim.update(LocomotionState::Walking, 100.0);
    anim.update(LocomotionState::Walking, 90.0);
    assert_eq!(anim.frame(), 1);

    anim.update(LocomotionState::Idle, 0.0);
    assert_eq!(anim.displayed_state(), LocomotionState::Idle);
    assert_eq!(anim.frame(), 0);

    // The partial walk timer must not carry over.
    anim.update(LocomotionState::Idle, 100.0);
    assert_eq!(anim.frame(), 0);
}

#[test]
fn test_dashing_freezes_animation() {
    let mut anim = machine();
    anim.update(LocomotionState::Walking, 100.0);
    anim.update(LocomotionState::Walking, 100.0);
    assert_eq!(anim.frame(), 2);

    for _ in 0..20 {
        anim.update(LocomotionState::Dashing, 100.0);
    }
    assert_eq!(anim.frame(), 2);
    assert_eq!(anim.displayed_state(), LocomotionState::Walking);
}

#[test]
fn test_empty_clip_never_advances() {
    let mut anim = machine();
    for _ in 0..10 {
        anim.update(LocomotionState::Jumping, 500.0);
    }
    assert_eq!(anim.frame(), 0);
}

#[test]
fn test_missing_clip_never_advances() {
    let mut anim = machine();
    anim.update(LocomotionState::Falling, 1000.0);
    assert_eq!(anim.displayed_state(), LocomotionState::Falling);
    assert_eq!(anim.frame(), 0);
}

// ---- manifest ----

#[test]
fn test_manifest_parses_clips() {
    let json = r#"{
        "version": 1,
        "size": 64,
        "clips": [
            { "state": "Idle", "frames": ["a.png", "b.png"], "frame_delay_ms": 150 },
            { "state": "Sprint", "frame_delay_ms": 80 }
        ]
    }"#;

    let manifest = ManifestJson::parse(json).unwrap();
    assert_eq!(manifest.clips.len(), 2);
    assert_eq!(manifest.clips[0].state, LocomotionState::Idle);
    assert_eq!(manifest.clips[0].frames.len(), 2);
    assert!(manifest.clips[1].frames.is_empty());
}

#[test]
fn test_manifest_rejects_unknown_state() {
    let json = r#"{ "version": 1, "size": 64, "clips": [
        { "state": "Swimming", "frames": [], "frame_delay_ms": 100 }
    ] }"#;
    assert!(ManifestJson::parse(json).is_err());
}
