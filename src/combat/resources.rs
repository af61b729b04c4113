//! Combat domain: tuning and input resources.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

/// Player-side combat numbers. Distances in pixels, timers in ticks.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub player_max_health: i32,
    pub max_ammo: u32,
    pub fire_rate: u32,
    pub reload_rate: u32,
    pub gun_gap: f32,
    /// Pixels per tick.
    pub bullet_speed: f32,
    /// Width and height in pixels.
    pub bullet_size: [f32; 2],
    pub bullet_damage: i32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            player_max_health: 100,
            max_ammo: 10,
            fire_rate: 10,
            reload_rate: 60,
            gun_gap: 20.0,
            bullet_speed: 14.0,
            bullet_size: [16.0, 8.0],
            bullet_damage: 15,
        }
    }
}

/// Enemy AI numbers. Distances in pixels, speeds in pixels per tick.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub max_health: i32,
    pub half_extents: [f32; 2],
    /// Ticks between shots at full health.
    pub base_fire_rate: f32,
    /// Fastest allowed fire cooldown in ticks.
    pub min_fire_rate: f32,
    pub bullet_speed: f32,
    pub bullet_size: [f32; 2],
    pub gun_gap: f32,
    pub bullet_damage: i32,
    /// Chance an overlapping enemy bullet actually damages the player.
    pub hit_chance: f64,
    pub dodge_chance: f64,
    pub dodge_distance: f32,
    pub dodge_speed: f32,
    /// Pattern re-selection interval at full health, in ticks.
    pub pattern_interval: f32,
    pub pattern_speed: f32,
    pub orbit_radius: f32,
    pub approach_min: f32,
    pub approach_max: f32,
    /// Drift back to the spawn point while calm.
    pub return_speed: f32,
    /// Inset from the viewport edges the enemy may not cross.
    pub bounds_margin: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            max_health: 400,
            half_extents: [40.0, 40.0],
            base_fire_rate: 90.0,
            min_fire_rate: 20.0,
            bullet_speed: 7.0,
            bullet_size: [16.0, 8.0],
            gun_gap: 48.0,
            bullet_damage: 10,
            hit_chance: 0.25,
            dodge_chance: 0.75,
            dodge_distance: 160.0,
            dodge_speed: 6.0,
            pattern_interval: 120.0,
            pattern_speed: 6.0,
            orbit_radius: 150.0,
            approach_min: 120.0,
            approach_max: 260.0,
            return_speed: 2.0,
            bounds_margin: 48.0,
        }
    }
}

/// Seeded randomness for hit rolls, dodges and pattern choice.
#[derive(Resource, Debug)]
pub struct CombatRng(pub ChaCha8Rng);

impl CombatRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Mouse state gathered each frame for the next fixed tick.
#[derive(Resource, Debug, Default)]
pub struct GunInput {
    /// Aim point in render space.
    pub aim: Option<Vec2>,
    /// Set by a click, cleared by the tick that sees it.
    pub fire_requested: bool,
    pub toggle_reload: bool,
}

impl GunInput {
    /// Latch this frame's presses. Holding a button does not repeat it.
    pub fn latch(&mut self, mouse: &ButtonInput<MouseButton>, keyboard: &ButtonInput<KeyCode>) {
        if mouse.just_pressed(MouseButton::Left) {
            self.fire_requested = true;
        }
        let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
        if keyboard.just_pressed(KeyCode::KeyR) && !ctrl {
            self.toggle_reload = true;
        }
    }

    /// Take the pending fire and reload requests, clearing both.
    pub fn take_requests(&mut self) -> (bool, bool) {
        (
            std::mem::take(&mut self.fire_requested),
            std::mem::take(&mut self.toggle_reload),
        )
    }
}
