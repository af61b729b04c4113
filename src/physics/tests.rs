//! Physics domain: unit tests for unit conversion, the deferred destruction
//! queue and the scripted world used by gameplay tests.

use bevy::prelude::*;

use super::avian::fixture_report;
use super::testing::ScriptedWorld;
use super::world::impulse_delta;
use super::{
    BodyDesc, BodyKind, BodyTag, DestructionQueue, PPM, RayControl, RigidBodyWorld, SteppedWorld,
    to_physics, to_pixels,
};
use crate::level::BlockKind;

fn floor_world() -> (ScriptedWorld, Entity) {
    let mut world = ScriptedWorld::new(Vec2::new(0.0, -20.0));
    let floor = world.create_body(&BodyDesc::solid_block(
        BlockKind::Dirt,
        Vec2::new(0.0, -0.5),
        Vec2::new(10.0, 0.5),
    ));
    (world, floor)
}

// ---- unit conversion ----

#[test]
fn test_position_and_velocity_share_one_scale() {
    let pixels = Vec2::new(128.0, 320.0);
    let meters = to_physics(pixels);
    assert_eq!(meters, Vec2::new(2.0, -5.0));

    // A velocity of one tile per second converts exactly like a one tile offset.
    let velocity_px = Vec2::new(PPM, -PPM);
    assert_eq!(to_physics(velocity_px), Vec2::new(1.0, 1.0));
}

#[test]
fn test_conversion_is_reversible() {
    let pixels = Vec2::new(-33.5, 917.25);
    let back = to_pixels(to_physics(pixels));
    assert!((back - pixels).length() < 1e-3);
}

#[test]
fn test_screen_down_is_physics_down() {
    let upper = to_physics(Vec2::new(0.0, 100.0));
    let lower = to_physics(Vec2::new(0.0, 200.0));
    assert!(lower.y < upper.y);
}

// ---- impulses ----

#[test]
fn test_impulse_on_massless_body_is_ignored() {
    assert_eq!(impulse_delta(Vec2::new(5.0, 5.0), 0.0), Vec2::ZERO);
    assert_eq!(impulse_delta(Vec2::new(4.0, 2.0), 2.0), Vec2::new(2.0, 1.0));
}

#[test]
fn test_impulse_scales_by_mass() {
    let (mut world, _) = floor_world();
    let body = world.create_body(&BodyDesc::actor(
        BodyKind::Dynamic,
        BodyTag::Player,
        Vec2::new(0.0, 3.0),
        Vec2::new(0.5, 0.5),
    ));
    let mass = world.body_state(body).map(|s| s.mass).unwrap();
    assert!((mass - 1.0).abs() < 1e-6);

    world.apply_linear_impulse(body, Vec2::new(mass * 3.0, 0.0));
    let velocity = world.body_state(body).unwrap().velocity;
    assert!((velocity.x - 3.0).abs() < 1e-6);
}

// ---- scripted world ----

#[test]
fn test_body_comes_to_rest_on_floor() {
    let (mut world, _) = floor_world();
    let body = world.create_body(&BodyDesc::actor(
        BodyKind::Dynamic,
        BodyTag::Player,
        Vec2::new(0.0, 2.0),
        Vec2::new(0.5, 0.5),
    ));

    world.run_ticks(120);

    let state = world.body_state(body).unwrap();
    assert!((state.position.y - 0.5).abs() < 0.02);
    assert_eq!(state.velocity.y, 0.0);
}

#[test]
fn test_zero_gravity_scale_holds_height() {
    let (mut world, _) = floor_world();
    let body = world.create_body(&BodyDesc::actor(
        BodyKind::Dynamic,
        BodyTag::Player,
        Vec2::new(0.0, 4.0),
        Vec2::new(0.5, 0.5),
    ));
    world.set_gravity_scale(body, 0.0);
    world.run_ticks(30);
    assert_eq!(world.body_state(body).unwrap().position.y, 4.0);
}

#[test]
fn test_ray_cast_reports_nearest_first() {
    let (mut world, floor) = floor_world();
    let ledge = world.create_body(&BodyDesc::solid_block(
        BlockKind::Dirt,
        Vec2::new(0.0, 2.0),
        Vec2::new(0.5, 0.5),
    ));

    let mut order = Vec::new();
    world.ray_cast(Vec2::new(0.0, 5.0), Vec2::new(0.0, -5.0), &mut |hit| {
        order.push((hit.body, hit.normal));
        RayControl::Continue
    });

    assert_eq!(order.len(), 2);
    assert_eq!(order[0].0, ledge);
    assert_eq!(order[0].1, Vec2::Y);
    assert_eq!(order[1].0, floor);
}

#[test]
fn test_ray_cast_stops_when_asked() {
    let (mut world, _) = floor_world();
    world.create_body(&BodyDesc::solid_block(
        BlockKind::Dirt,
        Vec2::new(0.0, 2.0),
        Vec2::new(0.5, 0.5),
    ));

    let mut count = 0;
    world.ray_cast(Vec2::new(0.0, 5.0), Vec2::new(0.0, -5.0), &mut |_| {
        count += 1;
        RayControl::Stop
    });
    assert_eq!(count, 1);
}

#[test]
fn test_side_hit_reports_horizontal_normal() {
    let (mut world, _) = floor_world();
    let wall = world.create_body(&BodyDesc::solid_block(
        BlockKind::Dirt,
        Vec2::new(3.0, 1.0),
        Vec2::new(0.5, 0.5),
    ));

    let mut normal = None;
    world.ray_cast(Vec2::new(0.0, 1.0), Vec2::new(5.0, 1.0), &mut |hit| {
        if hit.body == wall {
            normal = Some(hit.normal);
            return RayControl::Stop;
        }
        RayControl::Continue
    });
    assert_eq!(normal, Some(Vec2::NEG_X));
}

// ---- ray reports ----

#[test]
fn test_untagged_collider_is_not_reported() {
    let ray = (Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0));
    let stale = fixture_report(Entity::PLACEHOLDER, None, ray, 0.5, Vec2::Y);
    assert!(stale.is_none());
}

#[test]
fn test_tagged_collider_reports_point_along_ray() {
    let ray = (Vec2::new(0.0, 1.0), Vec2::new(0.0, -1.0));
    let tagged = Some((BodyTag::Block(BlockKind::Ice), false));
    let hit = fixture_report(Entity::PLACEHOLDER, tagged, ray, 0.25, Vec2::Y).unwrap();

    assert_eq!(hit.tag, BodyTag::Block(BlockKind::Ice));
    assert!(!hit.sensor);
    assert!((hit.point - Vec2::new(0.0, 0.5)).length() < 1e-6);
    assert_eq!(hit.fraction, 0.25);
}

// ---- destruction queue ----

#[test]
fn test_destruction_waits_for_drain() {
    let (mut world, floor) = floor_world();
    let mut queue = DestructionQueue::default();

    queue.schedule(floor);
    queue.schedule(floor);
    assert!(queue.is_scheduled(floor));
    assert!(world.contains(floor));

    // A step with a pending removal still sees the body.
    world.step(1.0 / 60.0);
    assert!(world.contains(floor));

    assert_eq!(queue.drain_into(&mut world), 1);
    assert!(!world.contains(floor));
    assert!(queue.is_empty());
}

#[test]
fn test_stale_handle_resolves_to_nothing() {
    let (mut world, floor) = floor_world();
    world.destroy_body(floor);
    assert!(world.body_state(floor).is_none());

    // A new body may reuse the slot but never the generation.
    let fresh = world.create_body(&BodyDesc::solid_block(
        BlockKind::Dirt,
        Vec2::ZERO,
        Vec2::splat(0.5),
    ));
    assert_ne!(fresh, floor);
    assert!(world.body_state(floor).is_none());

    // Operations on a stale handle are no-ops.
    world.set_linear_velocity(floor, Vec2::ONE);
    world.destroy_body(floor);
    assert_eq!(world.body_count(), 1);
}
