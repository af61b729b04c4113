//! Physics domain: the rigid-body world contract consumed by gameplay code.
//!
//! Gameplay never owns bodies. It holds a `BodyHandle` (an ECS entity, which
//! carries an index plus a generation) and talks to whatever world sits
//! behind this trait: avian2d in the running game, a scripted world in tests.

use bevy::prelude::*;

use crate::level::BlockKind;

/// Non-owning reference to a body. Stale handles resolve to `None`.
pub type BodyHandle = Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Dynamic,
    /// Moved by gameplay code, unaffected by gravity or contacts.
    Kinematic,
}

/// User data attached to every body, used to correlate contacts and ray hits.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyTag {
    Player,
    Enemy,
    Block(BlockKind),
}

/// Box body description. Positions and extents are in physics units.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub position: Vec2,
    pub half_extents: Vec2,
    pub density: f32,
    pub friction: f32,
    pub sensor: bool,
    pub fixed_rotation: bool,
    pub tag: BodyTag,
}

impl BodyDesc {
    pub fn solid_block(kind: BlockKind, position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            position,
            half_extents,
            density: 0.0,
            friction: kind.friction(),
            sensor: kind.is_sensor(),
            fixed_rotation: true,
            tag: BodyTag::Block(kind),
        }
    }

    pub fn actor(kind: BodyKind, tag: BodyTag, position: Vec2, half_extents: Vec2) -> Self {
        Self {
            kind,
            position,
            half_extents,
            density: 1.0,
            friction: 0.3,
            sensor: false,
            fixed_rotation: true,
            tag,
        }
    }
}

/// Snapshot of a body read back from the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub mass: f32,
}

/// One fixture hit reported by `RigidBodyWorld::ray_cast`.
#[derive(Debug, Clone, Copy)]
pub struct RayHit {
    pub body: BodyHandle,
    pub tag: BodyTag,
    pub sensor: bool,
    pub point: Vec2,
    /// Surface normal at the hit, pointing away from the surface.
    pub normal: Vec2,
    /// Distance along the ray as a fraction of its length.
    pub fraction: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RayControl {
    Continue,
    Stop,
}

pub trait RigidBodyWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    fn destroy_body(&mut self, body: BodyHandle);

    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;

    /// Teleport a body. Velocity is left untouched.
    fn set_position(&mut self, body: BodyHandle, position: Vec2);

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2);

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32);

    /// Mass-scaled impulse through the centre of mass. No-op for massless bodies.
    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2);

    /// Report fixtures crossed by the segment `start..end`, nearest first,
    /// until the callback answers `RayControl::Stop`.
    fn ray_cast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(&RayHit) -> RayControl);
}

/// A world that integrates itself when asked, at a fixed timestep.
pub trait SteppedWorld: RigidBodyWorld {
    fn step(&mut self, dt: f32);
}

/// Velocity change produced by an impulse on a body of the given mass.
pub fn impulse_delta(impulse: Vec2, mass: f32) -> Vec2 {
    if mass > 0.0 { impulse / mass } else { Vec2::ZERO }
}
