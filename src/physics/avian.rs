//! Physics domain: `RigidBodyWorld` backed by avian2d's ECS storage.

use avian2d::prelude::*;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::world::{
    BodyDesc, BodyHandle, BodyKind, BodyState, BodyTag, RayControl, RayHit, RigidBodyWorld,
    impulse_delta,
};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Solid level geometry (dirt, ice, parkour)
    Ground,
    /// Trigger fixtures (exit) - never block movement
    Sensor,
    Player,
    Enemy,
}

impl GameLayer {
    fn layers_for(tag: BodyTag, sensor: bool) -> CollisionLayers {
        match tag {
            BodyTag::Player => CollisionLayers::new(
                GameLayer::Player,
                [GameLayer::Ground, GameLayer::Sensor, GameLayer::Enemy],
            ),
            BodyTag::Enemy => {
                CollisionLayers::new(GameLayer::Enemy, [GameLayer::Ground, GameLayer::Player])
            }
            BodyTag::Block(_) if sensor => {
                CollisionLayers::new(GameLayer::Sensor, [GameLayer::Player])
            }
            BodyTag::Block(_) => CollisionLayers::new(
                GameLayer::Ground,
                [GameLayer::Default, GameLayer::Player, GameLayer::Enemy],
            ),
        }
    }
}

/// Maximum fixtures collected by a single ray cast.
const MAX_RAY_HITS: u32 = 16;

#[derive(SystemParam)]
pub struct AvianWorld<'w, 's> {
    commands: Commands<'w, 's>,
    pipeline: Res<'w, SpatialQueryPipeline>,
    bodies: Query<
        'w,
        's,
        (
            &'static mut Position,
            &'static mut LinearVelocity,
            Option<&'static mut GravityScale>,
            Option<&'static ComputedMass>,
        ),
    >,
    tags: Query<'w, 's, (&'static BodyTag, Has<Sensor>)>,
}

impl<'w, 's> AvianWorld<'w, 's> {
    /// Commands for attaching visuals or gameplay components to new bodies.
    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut self.commands
    }
}

impl RigidBodyWorld for AvianWorld<'_, '_> {
    fn create_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let rigid_body = match desc.kind {
            BodyKind::Static => RigidBody::Static,
            BodyKind::Dynamic => RigidBody::Dynamic,
            BodyKind::Kinematic => RigidBody::Kinematic,
        };

        let mut entity = self.commands.spawn((
            desc.tag,
            rigid_body,
            Collider::rectangle(desc.half_extents.x * 2.0, desc.half_extents.y * 2.0),
            GameLayer::layers_for(desc.tag, desc.sensor),
            Friction::new(desc.friction),
            Transform::from_xyz(desc.position.x, desc.position.y, 0.0),
        ));

        if desc.density > 0.0 {
            entity.insert(ColliderDensity(desc.density));
        }
        if desc.fixed_rotation {
            entity.insert(LockedAxes::ROTATION_LOCKED);
        }
        if desc.sensor {
            entity.insert(Sensor);
        }
        match desc.kind {
            BodyKind::Dynamic => {
                entity.insert(GravityScale(1.0));
            }
            BodyKind::Static => {
                entity.insert(CollisionEventsEnabled);
            }
            BodyKind::Kinematic => {}
        }

        entity.id()
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if let Ok(mut entity) = self.commands.get_entity(body) {
            entity.despawn();
        }
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        let (position, velocity, gravity, mass) = self.bodies.get(body).ok()?;
        Some(BodyState {
            position: position.0,
            velocity: velocity.0,
            gravity_scale: gravity.map_or(1.0, |g| g.0),
            mass: mass.map_or(0.0, |m| m.value()),
        })
    }

    fn set_position(&mut self, body: BodyHandle, position: Vec2) {
        if let Ok((mut current, ..)) = self.bodies.get_mut(body) {
            current.0 = position;
        }
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec2) {
        if let Ok((_, mut current, ..)) = self.bodies.get_mut(body) {
            current.0 = velocity;
        }
    }

    fn set_gravity_scale(&mut self, body: BodyHandle, scale: f32) {
        if let Ok((_, _, Some(mut gravity), _)) = self.bodies.get_mut(body) {
            gravity.0 = scale;
        }
    }

    fn apply_linear_impulse(&mut self, body: BodyHandle, impulse: Vec2) {
        if let Ok((_, mut velocity, _, mass)) = self.bodies.get_mut(body) {
            let mass = mass.map_or(0.0, |m| m.value());
            velocity.0 += impulse_delta(impulse, mass);
        }
    }

    fn ray_cast(&self, start: Vec2, end: Vec2, callback: &mut dyn FnMut(&RayHit) -> RayControl) {
        let length = start.distance(end);
        let Ok(direction) = Dir2::new(end - start) else {
            return;
        };

        let mut hits = self.pipeline.ray_hits(
            start,
            direction,
            length,
            MAX_RAY_HITS,
            true,
            &SpatialQueryFilter::default(),
        );
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        for hit in hits {
            let tagged = self.tags.get(hit.entity).ok().map(|(tag, sensor)| (*tag, sensor));
            let Some(report) = fixture_report(
                hit.entity,
                tagged,
                (start, end),
                hit.distance / length,
                hit.normal,
            ) else {
                continue;
            };
            if callback(&report) == RayControl::Stop {
                break;
            }
        }
    }
}

/// Report for one pipeline hit at `fraction` along `ray`. Colliders without a
/// body tag are skipped: the pipeline still holds bodies despawned since the
/// last step until the next one runs.
pub(crate) fn fixture_report(
    body: BodyHandle,
    tagged: Option<(BodyTag, bool)>,
    ray: (Vec2, Vec2),
    fraction: f32,
    normal: Vec2,
) -> Option<RayHit> {
    let (tag, sensor) = tagged?;
    let (start, end) = ray;
    Some(RayHit {
        body,
        tag,
        sensor,
        point: start.lerp(end, fraction),
        normal,
        fraction,
    })
}
