//! Movement domain: input gathering and the fixed-tick controller systems.

use bevy::prelude::*;

use super::components::{Control, ControlEvent, Hitbox, Player};
use super::controller::MovementController;
use super::cues::{play_cue, update_footsteps};
use super::resources::{MovementTuning, PendingControls};
use super::sensor::{ActorBody, GroundSensor};
use crate::audio::SoundQueue;
use crate::core::{SessionContext, Viewport};
use crate::physics::AvianWorld;

fn control_for(key: KeyCode) -> Option<Control> {
    match key {
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Control::Left),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Control::Right),
        KeyCode::ControlLeft | KeyCode::ControlRight => Some(Control::WalkModifier),
        KeyCode::Space => Some(Control::Jump),
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Some(Control::Dash),
        _ => None,
    }
}

/// Collect key transitions every frame; fixed ticks drain them in order.
pub(crate) fn read_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut pending: ResMut<PendingControls>,
) {
    for key in keyboard.get_just_pressed() {
        if let Some(control) = control_for(*key) {
            pending.events.push(ControlEvent::press(control));
        }
    }
    for key in keyboard.get_just_released() {
        if let Some(control) = control_for(*key) {
            pending.events.push(ControlEvent::release(control));
        }
    }
}

pub(crate) fn apply_controls(
    mut pending: ResMut<PendingControls>,
    tuning: Res<MovementTuning>,
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    world: AvianWorld,
    mut query: Query<(Entity, &Hitbox, &mut MovementController), With<Player>>,
) {
    let sensor = GroundSensor::from_tuning(&tuning);
    let events: Vec<ControlEvent> = pending.events.drain(..).collect();

    let Some((entity, hitbox, mut controller)) = query.iter_mut().next() else {
        return;
    };
    let body = ActorBody::from_hitbox(entity, hitbox);

    for event in events {
        if let Some(cue) = controller.apply_control(event, &world, &body, &sensor, &tuning) {
            play_cue(cue, &mut session, &mut *sounds);
        }
    }
}

pub(crate) fn pre_step_controllers(
    tuning: Res<MovementTuning>,
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    mut world: AvianWorld,
    mut query: Query<(Entity, &Hitbox, &mut MovementController), With<Player>>,
) {
    let sensor = GroundSensor::from_tuning(&tuning);

    for (entity, hitbox, mut controller) in &mut query {
        let body = ActorBody::from_hitbox(entity, hitbox);
        if let Some(cue) = controller.pre_step(&mut world, &body, &sensor, &tuning) {
            play_cue(cue, &mut session, &mut *sounds);
        }
    }
}

pub(crate) fn read_back_controllers(
    tuning: Res<MovementTuning>,
    viewport: Res<Viewport>,
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    mut world: AvianWorld,
    mut query: Query<(Entity, &Hitbox, &mut MovementController), With<Player>>,
) {
    let sensor = GroundSensor::from_tuning(&tuning);

    for (entity, hitbox, mut controller) in &mut query {
        let body = ActorBody::from_hitbox(entity, hitbox);
        if let Some(cue) =
            controller.post_step(&mut world, &body, &sensor, &tuning, viewport.size)
        {
            play_cue(cue, &mut session, &mut *sounds);
        }
        update_footsteps(controller.state, &mut session, &mut *sounds);
    }
}
