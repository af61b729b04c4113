//! Level domain: turning a parsed grid into bodies and actors.

use bevy::prelude::*;

use super::grid::{BlockKind, LevelGrid, TILE_SIZE};
use crate::combat::{CombatTuning, Enemy, EnemyAi, EnemyTuning, Gun, Health, Projectiles};
use crate::movement::{Hitbox, MovementController, Player};
use crate::physics::{
    AvianWorld, BodyDesc, BodyHandle, BodyKind, BodyTag, PPM, RigidBodyWorld, length_to_physics,
    to_physics,
};
use crate::sprites::{AnimationStateMachine, PlayerAnimations};

/// Everything spawned for a level. Despawned together on teardown.
#[derive(Component, Debug)]
pub struct LevelEntity;

/// Bodies created for one layout.
#[derive(Debug, Default)]
pub struct LevelBodies {
    pub blocks: Vec<(BodyHandle, BlockKind)>,
    pub player: Option<BodyHandle>,
    pub enemy: Option<BodyHandle>,
}

/// Create every block and actor body of `grid`. Half extents are pixels.
pub fn build_bodies(
    world: &mut impl RigidBodyWorld,
    grid: &LevelGrid,
    player_half_extents: Vec2,
    enemy_half_extents: Vec2,
) -> LevelBodies {
    let tile_half = Vec2::splat(length_to_physics(TILE_SIZE / 2.0));
    let mut bodies = LevelBodies::default();

    for (kind, center) in grid.blocks() {
        let desc = BodyDesc::solid_block(kind, to_physics(center), tile_half);
        bodies.blocks.push((world.create_body(&desc), kind));
    }

    if let Some(spawn) = grid.player_spawn() {
        let desc = BodyDesc::actor(
            BodyKind::Dynamic,
            BodyTag::Player,
            to_physics(spawn),
            player_half_extents / PPM,
        );
        bodies.player = Some(world.create_body(&desc));
    }

    if let Some(spawn) = grid.enemy_spawn() {
        let desc = BodyDesc::actor(
            BodyKind::Kinematic,
            BodyTag::Enemy,
            to_physics(spawn),
            enemy_half_extents / PPM,
        );
        bodies.enemy = Some(world.create_body(&desc));
    }

    bodies
}

/// Settings for the gameplay components attached to fresh actors.
pub struct ActorSettings<'a> {
    pub player_half_extents: Vec2,
    pub gun_enabled: bool,
    pub combat: &'a CombatTuning,
    pub enemy: &'a EnemyTuning,
    pub animations: &'a PlayerAnimations,
}

/// Build `grid` in the live world and attach sprites and gameplay components.
pub fn spawn_level(
    world: &mut AvianWorld,
    grid: &LevelGrid,
    settings: &ActorSettings,
) -> LevelBodies {
    let enemy_half = Vec2::from(settings.enemy.half_extents);
    let bodies = build_bodies(world, grid, settings.player_half_extents, enemy_half);
    let commands = world.commands();

    let tile = length_to_physics(TILE_SIZE);
    for (block, kind) in &bodies.blocks {
        commands.entity(*block).insert((
            LevelEntity,
            Sprite {
                color: kind.color(),
                custom_size: Some(Vec2::splat(tile)),
                ..default()
            },
        ));
    }

    if let Some(player) = bodies.player {
        let mut gun = Gun::from_tuning(settings.combat);
        gun.enabled = settings.gun_enabled;

        let sprite_size = settings
            .animations
            .size
            .map_or(settings.player_half_extents * 2.0, Vec2::splat);

        commands.entity(player).insert((
            LevelEntity,
            Player,
            Hitbox {
                half_extents: settings.player_half_extents,
            },
            MovementController::default(),
            AnimationStateMachine::from_animations(settings.animations),
            Health::new(settings.combat.player_max_health),
            gun,
            Projectiles::default(),
            Sprite {
                color: Color::srgb(0.85, 0.85, 0.95),
                custom_size: Some(sprite_size / PPM),
                ..default()
            },
        ));
    }

    if let Some(enemy) = bodies.enemy {
        let home = grid.enemy_spawn().unwrap_or_default();
        let mut ai = EnemyAi::new(home, settings.enemy);
        ai.target = bodies.player;

        commands.entity(enemy).insert((
            LevelEntity,
            Enemy,
            Hitbox {
                half_extents: enemy_half,
            },
            Health::new(settings.enemy.max_health),
            ai,
            Projectiles::default(),
            Sprite {
                color: Color::srgb(0.6, 0.1, 0.2),
                custom_size: Some(enemy_half * 2.0 / PPM),
                ..default()
            },
        ));
    }

    bodies
}
