//! UI domain: health and ammo readouts.

use bevy::prelude::*;

use crate::combat::{Enemy, Gun, Health};
use crate::movement::Player;

const HUD_PADDING: f32 = 16.0;

#[derive(Component)]
pub struct PlayerHealthText;

#[derive(Component)]
pub struct BulletsText;

#[derive(Component)]
pub struct EnemyHealthText;

pub fn health_label(health: &Health) -> String {
    format!("HEALTH: {} / {}", health.current, health.max)
}

pub fn bullets_label(gun: &Gun) -> String {
    if gun.reloading {
        format!("BULLETS: {} / {} (reloading)", gun.ammo, gun.max_ammo)
    } else {
        format!("BULLETS: {} / {}", gun.ammo, gun.max_ammo)
    }
}

fn hud_text(marker: impl Component, color: Color) -> impl Bundle {
    (
        marker,
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(color),
    )
}

pub(crate) fn spawn_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(HUD_PADDING),
            top: Val::Px(HUD_PADDING),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn(hud_text(PlayerHealthText, Color::srgb(0.9, 0.9, 0.9)));
            parent.spawn(hud_text(BulletsText, Color::srgb(0.9, 0.85, 0.5)));
        });

    commands.spawn((
        hud_text(EnemyHealthText, Color::srgb(0.95, 0.4, 0.4)),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(HUD_PADDING),
            top: Val::Px(HUD_PADDING),
            ..default()
        },
    ));
}

pub(crate) fn update_hud(
    players: Query<(&Health, &Gun), (With<Player>, Without<Enemy>)>,
    enemies: Query<&Health, With<Enemy>>,
    mut player_text: Query<
        &mut Text,
        (
            With<PlayerHealthText>,
            Without<BulletsText>,
            Without<EnemyHealthText>,
        ),
    >,
    mut bullets_text: Query<
        &mut Text,
        (
            With<BulletsText>,
            Without<PlayerHealthText>,
            Without<EnemyHealthText>,
        ),
    >,
    mut enemy_text: Query<
        &mut Text,
        (
            With<EnemyHealthText>,
            Without<PlayerHealthText>,
            Without<BulletsText>,
        ),
    >,
) {
    let player = players.iter().next();

    for mut text in &mut player_text {
        **text = player.map(|(health, _)| health_label(health)).unwrap_or_default();
    }
    for mut text in &mut bullets_text {
        **text = player
            .filter(|(_, gun)| gun.enabled)
            .map(|(_, gun)| bullets_label(gun))
            .unwrap_or_default();
    }
    for mut text in &mut enemy_text {
        **text = enemies
            .iter()
            .next()
            .map(|health| format!("ENEMY: {}", health.current))
            .unwrap_or_default();
    }
}
