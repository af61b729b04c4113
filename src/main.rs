mod audio;
mod combat;
mod content;
mod core;
#[cfg(feature = "dev-tools")]
mod debug;
mod level;
mod movement;
mod physics;
mod sprites;
mod ui;

use bevy::prelude::*;

fn main() {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "El Captcha Oscuro".to_string(),
            resolution: (1280, 720).into(),
            resizable: false,
            ..default()
        }),
        ..default()
    }))
    .add_plugins(physics::PhysicsPlugin)
    .add_plugins((
        core::CorePlugin,
        content::ContentPlugin,
        movement::MovementPlugin,
        sprites::SpritesPlugin,
        combat::CombatPlugin,
        level::LevelPlugin,
        audio::AudioCuesPlugin,
        ui::UiPlugin,
    ));

    #[cfg(feature = "dev-tools")]
    app.add_plugins(debug::DebugPlugin);

    app.run();
}
