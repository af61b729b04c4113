//! Headless rigid-body world used by unit tests.
//!
//! Boxes only: gravity, gravity scale, impulses, fixed-step integration, slab
//! ray casts and minimum-axis contact resolution against static or kinematic
//! solids. Handles are real ECS entities so stale handles behave like they do
//! in the running game.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::world::{
    BodyDesc, BodyHandle, BodyKind, BodyState, RayControl, RayHit, RigidBodyWorld, SteppedWorld,
    impulse_delta,
};

#[derive(Debug, Clone)]
struct ScriptedBody {
    desc: BodyDesc,
    position: Vec2,
    velocity: Vec2,
    gravity_scale: f32,
    mass: f32,
}

impl ScriptedBody {
    fn min(&self) -> Vec2 {
        self.position - self.desc.half_extents
    }

    fn max(&self) -> Vec2 {
        self.position + self.desc.half_extents
    }

    fn blocks(&self) -> bool {
        !self.desc.sensor && self.desc.kind != BodyKind::Dynamic
    }
}

pub struct ScriptedWorld {
    ids: World,
    bodies: BTreeMap<Entity, ScriptedBody>,
    pub gravity: Vec2,
}

impl ScriptedWorld {
    pub fn new(gravity: Vec2) -> Self {
        Self {
            ids: World::new(),
            bodies: BTreeMap::new(),
            gravity,
        }
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Step `ticks` times at 60 Hz.
    pub fn run_ticks(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step(1.0 / 60.0);
        }
    }

    fn resolve_contacts(&mut self, body: Entity) {
        let solids: Vec<(Vec2, Vec2)> = self
            .bodies
            .iter()
            .filter(|(id, b)| **id != body && b.blocks())
            .map(|(_, b)| (b.position, b.desc.half_extents))
            .collect();

        let Some(moving) = self.bodies.get_mut(&body) else {
            return;
        };

        for (center, half) in solids {
            let delta = moving.position - center;
            let overlap = moving.desc.half_extents + half - delta.abs();
            if overlap.x <= 0.0 || overlap.y <= 0.0 {
                continue;
            }
            if overlap.y <= overlap.x {
                let push = delta.y.signum();
                moving.position.y += push * overlap.y;
                if moving.velocity.y * push < 0.0 {
                    moving.velocity.y = 0.0;
                }
            } else {
                let push = delta.x.signum();
                moving.position.x += push * overlap.x;
                if moving.velocity.x * push < 0.0 {
                    moving.velocity.x = 0.0;
                }
            }
        }
    }
}

/// Slab test of segment `start + t * dir`, t in [0, 1], against a box.
/// Returns the entry fraction and the surface normal at entry.
fn segment_vs_box(start: Vec2, dir: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = -dir.normalize_or_zero();

    for axis in 0..2 {
        let (p, d, lo, hi) = (start[axis], dir[axis], min[axis], max[axis]);
        if d.abs() < f32::EPSILON {
            if p < lo || p > hi {
                return None;
            }
            continue;
        }
        let (mut t1, mut t2) = ((lo - p) / d, (hi - p) / d);
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }
        if t1 > t_enter {
            t_enter = t1;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_exit = t_exit.min(t2);
    }

    if t_enter > t_exit || t_exit < 0.0 || t_enter > 1.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Starts inside the box: reported at the origin with no surface normal.
        return Some((0.0, Vec2::ZERO));
    }
    Some((t_enter, normal))
}

impl RigidBodyWorld for ScriptedWorld {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let id = self.ids.spawn_empty().id();
        let mass = match desc.kind {
            BodyKind::Dynamic => desc.density * 4.0 * desc.half_extents.x * desc.half_extents.y,
            _ => 0.0,
        };
        self.bodies.insert(
            id,
            ScriptedBody {
                desc: desc.clone(),
                position: desc.position,
                velocity: Vec2::ZERO,
                gravity_scale: 1.0,
                mass,
            },
        );
        id
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(&body).is_some() {
            self.ids.despawn(body);
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.bodies.get(&body).map(|b| BodyState {
            position: b.position,
            velocity: b.velocity,
            gravity_scale: b.gravity_scale,
            mass: b.mass,
        })
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
        }
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.gravity_scale = scale;
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity += impulse_delta(impulse, b.mass);
        }
    }

    fn ray_cast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(&RayHit) -> RayControl) {
        let dir = end - start;
        let mut hits: Vec<RayHit> = self
            .bodies
            .iter()
            .filter_map(|(id, b)| {
                let (fraction, normal) = segment_vs_box(start, dir, b.min(), b.max())?;
                Some(RayHit {
                    body: *id,
                    tag: b.desc.tag,
                    sensor: b.desc.sensor,
                    point: start + dir * fraction,
                    normal,
                    fraction,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));

        for hit in &hits {
            if callback(hit) == RayControl::Stop {
                break;
            }
        }
    }
}

impl SteppedWorld for ScriptedWorld {
    fn step(&mut self, dt: f32) {
        let gravity = self.gravity;
        let moving: Vec<Entity> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.desc.kind != BodyKind::Static)
            .map(|(id, _)| *id)
            .collect();

        for id in moving {
            let Some(b) = self.bodies.get_mut(&id) else {
                continue;
            };
            let dynamic = b.desc.kind == BodyKind::Dynamic;
            if dynamic {
                b.velocity += gravity * b.gravity_scale * dt;
            }
            b.position += b.velocity * dt;
            if dynamic {
                self.resolve_contacts(id);
            }
        }
    }
}
