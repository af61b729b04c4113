//! Debug domain: stat dumps and collision gizmos.

use bevy::prelude::*;

use crate::combat::{Enemy, Health};
use crate::core::SessionContext;
use crate::debug::state::DebugState;
use crate::level::{ActiveLevel, Outcome};
use crate::movement::{Hitbox, MovementController, MovementTuning, Player};
use crate::physics::{PPM, length_to_physics};

pub fn stats_report(
    player: Option<&Health>,
    enemy: Option<&Health>,
    outcome: Option<Outcome>,
    level: Option<usize>,
) -> String {
    let describe = |health: Option<&Health>| {
        health.map_or_else(
            || "none".to_string(),
            |h| format!("{}/{}", h.current, h.max),
        )
    };
    let level = level.map_or_else(|| "none".to_string(), |index| index.to_string());
    format!(
        "[DEBUG] level {} | player {} | enemy {} | game over: {}",
        level,
        describe(player),
        describe(enemy),
        outcome == Some(Outcome::Lost)
    )
}

/// P logs the actor stats.
pub(crate) fn log_stats_hotkey(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<SessionContext>,
    active: Res<ActiveLevel>,
    players: Query<&Health, (With<Player>, Without<Enemy>)>,
    enemies: Query<&Health, With<Enemy>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyP) {
        return;
    }
    info!(
        "{}",
        stats_report(
            players.iter().next(),
            enemies.iter().next(),
            active.outcome(),
            session.current_level,
        )
    );
}

/// F3 toggles hitbox and probe drawing.
pub(crate) fn toggle_gizmos(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut debug_state: ResMut<DebugState>,
) {
    if keyboard.just_pressed(KeyCode::F3) {
        debug_state.show_gizmos = !debug_state.show_gizmos;
        info!("Debug gizmos {}", if debug_state.show_gizmos { "on" } else { "off" });
    }
}

pub(crate) fn draw_debug_gizmos(
    mut gizmos: Gizmos,
    debug_state: Res<DebugState>,
    tuning: Res<MovementTuning>,
    actors: Query<(&Transform, &Hitbox, Option<&MovementController>)>,
) {
    if !debug_state.show_gizmos {
        return;
    }

    for (transform, hitbox, controller) in &actors {
        let center = transform.translation.truncate();
        let half = hitbox.half_extents / PPM;
        gizmos.rect_2d(
            Isometry2d::from_translation(center),
            half * 2.0,
            Color::srgb(0.2, 1.0, 0.2),
        );

        let Some(controller) = controller else {
            continue;
        };
        let probe = length_to_physics(tuning.ground_probe);
        let color = if controller.state.is_airborne() {
            Color::srgb(1.0, 0.3, 0.3)
        } else {
            Color::srgb(0.3, 0.6, 1.0)
        };
        for offset in [-0.9, -0.45, 0.0, 0.45, 0.9] {
            let start = center + Vec2::new(half.x * offset, -half.y);
            gizmos.line_2d(start, start - Vec2::Y * probe, color);
        }
    }
}
