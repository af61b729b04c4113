//! Core domain: camera setup and session lifecycle systems.

use bevy::camera::ScalingMode;
use bevy::prelude::*;

use super::resources::{SessionContext, Viewport};
use crate::physics::{PPM, to_physics};

/// Orthographic camera over the viewport, in physics units.
pub(crate) fn setup_camera(mut commands: Commands, viewport: Res<Viewport>) {
    let center = to_physics(viewport.size / 2.0);
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: viewport.size.x / PPM,
                height: viewport.size.y / PPM,
            },
            ..OrthographicProjection::default_2d()
        }),
        Transform::from_xyz(center.x, center.y, 0.0),
    ));
}

/// The menu lives outside the game; boot straight into the first level.
pub(crate) fn boot_first_level(mut session: ResMut<SessionContext>) {
    info!("Booting into level 0");
    session.set_current_level(0);
}

pub(crate) fn handle_quit_key(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<SessionContext>,
) {
    if keyboard.just_pressed(KeyCode::KeyQ) {
        info!("Quit requested");
        session.quit();
    }
}

pub(crate) fn exit_when_stopped(session: Res<SessionContext>, mut exit: MessageWriter<AppExit>) {
    if !session.running {
        exit.write(AppExit::Success);
    }
}
