//! UI domain: win and game-over overlay.

use bevy::prelude::*;

use crate::level::{ActiveLevel, Outcome};

#[derive(Component)]
pub struct EndScreenUI;

pub fn end_message(outcome: Outcome) -> (&'static str, &'static str) {
    match outcome {
        Outcome::Won => ("YOU WIN!", "Press C for credits"),
        Outcome::Lost => ("GAME OVER", "Press G to try again"),
    }
}

pub(crate) fn spawn_end_screen(mut commands: Commands, active: Res<ActiveLevel>) {
    let Some(outcome) = active.outcome() else {
        return;
    };
    let (title, hint) = end_message(outcome);
    let title_color = match outcome {
        Outcome::Won => Color::srgb(0.4, 0.9, 0.5),
        Outcome::Lost => Color::srgb(0.8, 0.15, 0.15),
    };

    commands
        .spawn((
            EndScreenUI,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                flex_direction: FlexDirection::Column,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            ZIndex(100),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: 72.0,
                    ..default()
                },
                TextColor(title_color),
                Node {
                    margin: UiRect::bottom(Val::Px(24.0)),
                    ..default()
                },
            ));
            parent.spawn((
                Text::new(hint),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));
        });
}

pub(crate) fn cleanup_end_screen(mut commands: Commands, query: Query<Entity, With<EndScreenUI>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
