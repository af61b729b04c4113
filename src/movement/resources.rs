//! Movement domain: tuning and input resources.

use bevy::prelude::*;
use serde::Deserialize;

use super::components::ControlEvent;

/// Locomotion tuning. Distances and speeds are in pixels (per second),
/// timers in fixed ticks. Values are converted to physics units at the
/// body boundary.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub walk_speed: f32,
    pub run_speed: f32,
    /// Upward speed gained from the jump impulse.
    pub jump_velocity: f32,
    pub dash_velocity: f32,
    pub dash_duration: u32,
    pub dash_cooldown: u32,
    /// Ticks after leaving a surface during which jumping is still allowed.
    pub ground_forgiveness: u32,
    pub ground_probe: f32,
    pub wall_probe: f32,
    pub ceiling_probe: f32,
    /// Minimum upward component of a surface normal for it to count as ground.
    pub ground_normal_threshold: f32,
    /// Fraction of the velocity error corrected per tick by the move impulse.
    pub ground_blend: f32,
    pub ice_blend: f32,
    pub air_blend: f32,
    /// Per-tick velocity multiplier with no horizontal input.
    pub ground_damping: f32,
    pub ice_damping: f32,
    /// Below this speed with input held, the body is kicked to `min_speed_boost`.
    pub min_speed_threshold: f32,
    pub min_speed_boost: f32,
    /// Horizontal speed separating IDLE from WALKING/SPRINT.
    pub moving_threshold: f32,
    pub wall_push: f32,
    pub wall_push_down: f32,
    /// Fraction of upward speed reflected downward on a ceiling hit.
    pub ceiling_bounce: f32,
    /// Horizontal travel per tick under which a pushing body counts as stuck.
    pub stuck_epsilon: f32,
    pub stuck_ticks: u32,
    pub unstick_lift: f32,
    /// Distance past the viewport edge that triggers a wrap.
    pub wrap_margin: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_speed: 180.0,
            run_speed: 320.0,
            jump_velocity: 620.0,
            dash_velocity: 900.0,
            dash_duration: 12,
            dash_cooldown: 60,
            ground_forgiveness: 6,
            ground_probe: 3.0,
            wall_probe: 4.0,
            ceiling_probe: 4.0,
            ground_normal_threshold: 0.85,
            ground_blend: 1.0,
            ice_blend: 0.08,
            air_blend: 0.35,
            ground_damping: 0.8,
            ice_damping: 0.985,
            min_speed_threshold: 6.0,
            min_speed_boost: 60.0,
            moving_threshold: 8.0,
            wall_push: 40.0,
            wall_push_down: 30.0,
            ceiling_bounce: 0.3,
            stuck_epsilon: 0.5,
            stuck_ticks: 10,
            unstick_lift: 60.0,
            wrap_margin: 64.0,
        }
    }
}

/// Control events gathered between fixed ticks, applied in order.
#[derive(Resource, Debug, Default)]
pub struct PendingControls {
    pub events: Vec<ControlEvent>,
}
