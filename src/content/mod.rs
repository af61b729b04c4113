//! Content domain: gameplay tuning loaded from RON.

mod data;
mod loader;


pub use data::GameplayTuning;
pub use loader::{ContentLoadError, load_tuning, load_tuning_or_default, parse_tuning};

use std::path::Path;

use bevy::prelude::*;

use crate::physics::gravity_from_pixels;

const TUNING_PATH: &str = "assets/data/tuning.ron";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_gameplay_tuning);
    }
}

/// Insert every tuning section as its own resource.
fn load_gameplay_tuning(mut commands: Commands) {
    let tuning = load_tuning_or_default(Path::new(TUNING_PATH));

    commands.insert_resource(gravity_from_pixels(tuning.levels.gravity));
    commands.insert_resource(tuning.movement);
    commands.insert_resource(tuning.combat);
    commands.insert_resource(tuning.enemy);
    commands.insert_resource(tuning.levels);
}
