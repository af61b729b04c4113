//! Combat domain: gun input, projectile flight and hit resolution.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use rand::Rng;

use crate::audio::{SoundPlayer, SoundQueue};
use crate::combat::components::{Enemy, Gun, Health, Projectile, Projectiles};
use crate::combat::resources::{CombatRng, CombatTuning, EnemyTuning, GunInput};
use crate::core::Viewport;
use crate::movement::{Hitbox, Player};
use crate::physics::{AvianWorld, PPM, RigidBodyWorld, to_physics, to_pixels};

const EFFECT_VOLUME: f32 = 0.5;

/// Outcome of testing one actor's bullets against a target box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShotReport {
    /// Bullets that overlapped the target and were removed.
    pub removed: u32,
    /// Overlaps that actually dealt damage.
    pub landed: u32,
}

/// Remove every bullet overlapping `target`; each one deals `damage`.
pub fn strike(
    bullets: &mut Vec<Projectile>,
    target: Rect,
    health: &mut Health,
    damage: i32,
) -> ShotReport {
    let mut report = ShotReport::default();
    bullets.retain(|bullet| {
        if bullet.aabb().intersect(target).is_empty() {
            return true;
        }
        report.removed += 1;
        report.landed += 1;
        health.take_damage(damage);
        false
    });
    report
}

/// Remove every bullet overlapping `target`; each one deals `damage` only
/// with probability `hit_chance`.
pub fn strike_with_chance(
    bullets: &mut Vec<Projectile>,
    target: Rect,
    health: &mut Health,
    damage: i32,
    hit_chance: f64,
    rng: &mut impl Rng,
) -> ShotReport {
    let chance = hit_chance.clamp(0.0, 1.0);
    let mut report = ShotReport::default();
    bullets.retain(|bullet| {
        if bullet.aabb().intersect(target).is_empty() {
            return true;
        }
        report.removed += 1;
        if rng.random_bool(chance) {
            report.landed += 1;
            health.take_damage(damage);
        }
        false
    });
    report
}

/// Sample the mouse and reload key once per frame.
pub(crate) fn gather_gun_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut input: ResMut<GunInput>,
) {
    input.latch(&mouse, &keyboard);

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    if let Ok(point) = camera.viewport_to_world_2d(camera_transform, cursor) {
        input.aim = Some(to_pixels(point));
    }
}

/// One tick of a gun. `line` is the muzzle origin and aim point, when known.
pub fn operate_gun(
    gun: &mut Gun,
    fire: bool,
    toggle_reload: bool,
    line: Option<(Vec2, Vec2)>,
) -> Option<Projectile> {
    gun.tick();

    if !gun.enabled {
        return None;
    }
    if toggle_reload {
        gun.toggle_reload();
        debug!("Reload {}", if gun.reloading { "started" } else { "stopped" });
    }
    if !fire {
        return None;
    }
    let (origin, aim) = line?;
    gun.try_fire(origin, aim)
}

pub(crate) fn fire_player_gun(
    mut input: ResMut<GunInput>,
    mut sounds: ResMut<SoundQueue>,
    world: AvianWorld,
    mut query: Query<(Entity, &mut Gun, &mut Projectiles), With<Player>>,
) {
    let (fire, toggle_reload) = input.take_requests();

    for (entity, mut gun, mut projectiles) in &mut query {
        let origin = world.body_state(entity).map(|body| to_pixels(body.position));
        let line = origin.zip(input.aim);
        if let Some(shot) = operate_gun(&mut gun, fire, toggle_reload, line) {
            projectiles.0.push(shot);
            sounds.play_sound("shoot", false, EFFECT_VOLUME);
        }
    }
}

pub(crate) fn advance_projectiles(viewport: Res<Viewport>, mut query: Query<&mut Projectiles>) {
    let bounds = viewport.bounds();
    for mut projectiles in &mut query {
        projectiles.advance(bounds);
    }
}

pub(crate) fn resolve_projectile_hits(
    combat: Res<CombatTuning>,
    enemy_tuning: Res<EnemyTuning>,
    mut rng: ResMut<CombatRng>,
    mut sounds: ResMut<SoundQueue>,
    world: AvianWorld,
    mut players: Query<
        (Entity, &Hitbox, &mut Health, &mut Projectiles),
        (With<Player>, Without<Enemy>),
    >,
    mut enemies: Query<(Entity, &Hitbox, &mut Health, &mut Projectiles), With<Enemy>>,
) {
    let Some((player, player_box, mut player_health, mut player_shots)) =
        players.iter_mut().next()
    else {
        return;
    };
    let Some(player_state) = world.body_state(player) else {
        return;
    };
    let player_rect = Rect::from_center_half_size(
        to_pixels(player_state.position),
        player_box.half_extents,
    );

    for (enemy, enemy_box, mut enemy_health, mut enemy_shots) in &mut enemies {
        let Some(enemy_state) = world.body_state(enemy) else {
            continue;
        };
        let enemy_rect = Rect::from_center_half_size(
            to_pixels(enemy_state.position),
            enemy_box.half_extents,
        );

        let outgoing = strike(
            &mut player_shots.0,
            enemy_rect,
            &mut enemy_health,
            combat.bullet_damage,
        );
        let incoming = strike_with_chance(
            &mut enemy_shots.0,
            player_rect,
            &mut player_health,
            enemy_tuning.bullet_damage,
            enemy_tuning.hit_chance,
            &mut rng.0,
        );

        if outgoing.landed > 0 || incoming.landed > 0 {
            sounds.play_sound("hit", false, EFFECT_VOLUME);
            debug!(
                "Hits: enemy took {}, player took {} (health {} / {})",
                outgoing.landed, incoming.landed, enemy_health.current, player_health.current
            );
        }
    }
}

/// Bullets have no sprite of their own; draw their boxes.
pub(crate) fn draw_projectiles(
    mut gizmos: Gizmos,
    players: Query<&Projectiles, With<Player>>,
    enemies: Query<&Projectiles, With<Enemy>>,
) {
    let mut draw = |bullets: &Projectiles, color: Color| {
        for bullet in &bullets.0 {
            let center = to_physics(bullet.position);
            let rotation = Rot2::degrees(-bullet.angle_deg);
            gizmos.rect_2d(Isometry2d::new(center, rotation), bullet.size / PPM, color);
        }
    };
    for bullets in &players {
        draw(bullets, Color::srgb(1.0, 0.9, 0.3));
    }
    for bullets in &enemies {
        draw(bullets, Color::srgb(1.0, 0.3, 0.3));
    }
}
