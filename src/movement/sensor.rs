//! Movement domain: ray-cast ground, wall and ceiling queries.
//!
//! The sensor holds no per-actor state. The forgiveness counter that keeps an
//! actor grounded for a few ticks after leaving a surface belongs to the
//! caller and is only read here.

use bevy::prelude::*;

use super::components::Hitbox;
use super::resources::MovementTuning;
use crate::level::BlockKind;
use crate::physics::{
    BodyHandle, BodyTag, PPM, RayControl, RayHit, RigidBodyWorld, length_to_physics,
};

/// Rays start this far inside the box so a resting contact is always crossed.
const SKIN: f32 = 0.1 / PPM;

/// Horizontal offsets of the ground rays, as fractions of the half width.
const GROUND_RAY_OFFSETS: [f32; 5] = [0.0, -0.45, 0.45, -0.9, 0.9];

/// An actor's body as seen by the sensor, in physics units.
#[derive(Debug, Clone, Copy)]
pub struct ActorBody {
    pub handle: BodyHandle,
    pub half_extents: Vec2,
}

impl ActorBody {
    pub fn from_hitbox(handle: BodyHandle, hitbox: &Hitbox) -> Self {
        Self {
            handle,
            half_extents: hitbox.half_extents / PPM,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Surface {
    #[default]
    Ground,
    Ice,
}

impl Surface {
    fn from_tag(tag: BodyTag) -> Self {
        match tag {
            BodyTag::Block(BlockKind::Ice) => Surface::Ice,
            _ => Surface::Ground,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub surface: Surface,
}

#[derive(Debug, Clone, Copy)]
pub struct GroundSensor {
    pub ground_probe: f32,
    pub wall_probe: f32,
    pub ceiling_probe: f32,
    pub normal_threshold: f32,
}

impl GroundSensor {
    pub fn from_tuning(tuning: &MovementTuning) -> Self {
        Self {
            ground_probe: length_to_physics(tuning.ground_probe),
            wall_probe: length_to_physics(tuning.wall_probe),
            ceiling_probe: length_to_physics(tuning.ceiling_probe),
            normal_threshold: tuning.ground_normal_threshold,
        }
    }

    /// True while the forgiveness window is open or a ground ray hits.
    pub fn is_grounded(
        &self,
        world: &impl RigidBodyWorld,
        body: &ActorBody,
        forgiveness_timer: u32,
    ) -> bool {
        forgiveness_timer > 0 || self.ground_hit(world, body).is_some()
    }

    /// First accepted ground surface under the actor's feet.
    ///
    /// Each ray is decided by the nearest solid fixture it crosses: a wall face
    /// met first hides any floor behind it.
    pub fn ground_hit(&self, world: &impl RigidBodyWorld, body: &ActorBody) -> Option<GroundHit> {
        let position = world.body_state(body.handle)?.position;
        let bottom = position.y - body.half_extents.y + SKIN;

        GROUND_RAY_OFFSETS.iter().find_map(|offset| {
            let start = Vec2::new(position.x + offset * body.half_extents.x, bottom);
            let end = start - Vec2::new(0.0, self.ground_probe + SKIN);
            let hit = nearest_solid(world, body.handle, start, end)?;
            (hit.normal.y >= self.normal_threshold).then(|| GroundHit {
                surface: Surface::from_tag(hit.tag),
            })
        })
    }

    /// Short horizontal probe from the body centre toward `direction`.
    pub fn is_wall_ahead(
        &self,
        world: &impl RigidBodyWorld,
        body: &ActorBody,
        direction: f32,
    ) -> bool {
        if direction == 0.0 {
            return false;
        }
        let Some(state) = world.body_state(body.handle) else {
            return false;
        };
        let reach = body.half_extents.x + self.wall_probe;
        let end = state.position + Vec2::new(direction.signum() * reach, 0.0);
        nearest_solid(world, body.handle, state.position, end)
            .is_some_and(|hit| hit.normal.x.abs() >= self.normal_threshold)
    }

    /// Short upward probe from just inside the top edge.
    pub fn is_ceiling_above(&self, world: &impl RigidBodyWorld, body: &ActorBody) -> bool {
        let Some(state) = world.body_state(body.handle) else {
            return false;
        };
        let start = Vec2::new(state.position.x, state.position.y + body.half_extents.y - SKIN);
        let end = start + Vec2::new(0.0, self.ceiling_probe + SKIN);
        nearest_solid(world, body.handle, start, end)
            .is_some_and(|hit| hit.normal.y <= -self.normal_threshold)
    }
}

/// Nearest hit that is neither the actor's own body nor a sensor fixture.
fn nearest_solid(
    world: &impl RigidBodyWorld,
    own: BodyHandle,
    start: Vec2,
    end: Vec2,
) -> Option<RayHit> {
    let mut found = None;
    world.ray_cast(start, end, &mut |hit| {
        if hit.body == own || hit.sensor {
            return RayControl::Continue;
        }
        found = Some(*hit);
        RayControl::Stop
    });
    found
}
