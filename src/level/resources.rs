//! Level domain: tuning and the active level.

use bevy::prelude::*;
use serde::Deserialize;

use super::behavior::{LevelBehavior, LevelDirective, Outcome};

/// Level-wide numbers. Gravity in pixels/s², timers in ticks.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    pub gravity: f32,
    pub low_gravity: f32,
    /// Ticks a parkour block survives after the player first touches it.
    pub crumble_ticks: u32,
    pub slow_motion_scale: f32,
    /// Player health fraction under which the boss fight slows down.
    pub slow_motion_threshold: f32,
    pub player_half_extents: [f32; 2],
    pub levels_dir: String,
    pub music_volume: f32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            gravity: 1800.0,
            low_gravity: 1000.0,
            crumble_ticks: 45,
            slow_motion_scale: 0.6,
            slow_motion_threshold: 0.5,
            player_half_extents: [20.0, 30.0],
            levels_dir: "assets/levels".to_string(),
            music_volume: 0.4,
        }
    }
}

/// The level being played and the state its directives left behind.
#[derive(Resource)]
pub struct ActiveLevel {
    pub index: Option<usize>,
    pub behavior: Option<Box<dyn LevelBehavior>>,
    /// Layout name of the last successful build, reused by restarts.
    pub layout: Option<String>,
    pub gun_enabled: bool,
    pub time_scale: f32,
}

impl Default for ActiveLevel {
    fn default() -> Self {
        Self {
            index: None,
            behavior: None,
            layout: None,
            gun_enabled: false,
            time_scale: 1.0,
        }
    }
}

impl ActiveLevel {
    pub fn outcome(&self) -> Option<Outcome> {
        self.behavior.as_ref().and_then(|behavior| behavior.outcome())
    }
}

/// Directives raised by behavior hooks, applied once per frame.
#[derive(Resource, Debug, Default)]
pub struct LevelDirectives {
    pub pending: Vec<LevelDirective>,
}
