//! Physics domain: conversion between render pixels and simulation meters.
//!
//! Render space is the level grid's screen space: origin at the top-left
//! corner, y pointing down, measured in pixels. Physics space is measured in
//! meters with y pointing up, so gravity is a negative y acceleration. One
//! tile is one meter.

use bevy::prelude::*;

/// Pixels per physics unit.
pub const PPM: f32 = 64.0;

/// Convert a render-space point or velocity to physics space.
///
/// Positions and velocities use the same linear mapping, so the same function
/// serves both directions of travel across the boundary.
pub fn to_physics(pixels: Vec2) -> Vec2 {
    Vec2::new(pixels.x / PPM, -pixels.y / PPM)
}

/// Convert a physics-space point or velocity to render space.
pub fn to_pixels(meters: Vec2) -> Vec2 {
    Vec2::new(meters.x * PPM, -meters.y * PPM)
}

/// Convert a scalar length or speed (no axis flip).
pub fn length_to_physics(pixels: f32) -> f32 {
    pixels / PPM
}
