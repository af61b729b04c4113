//! Level domain: lifecycle, contacts and directive handling.

use std::path::Path;

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use super::behavior::{ActorStats, LevelContext, LevelDirective, LevelEvent};
use super::grid::{BlockKind, LevelGrid, load_level};
use super::levels::{CREDITS_LEVEL, level_behavior};
use super::resources::{ActiveLevel, LevelDirectives, LevelTuning};
use super::spawn::{ActorSettings, LevelEntity, spawn_level};
use crate::audio::SoundQueue;
use crate::combat::{CombatTuning, Enemy, EnemyTuning, GunInput, Health};
use crate::core::{GameState, SessionContext};
use crate::movement::{PendingControls, Player, silence_locomotion};
use crate::physics::{AvianWorld, BodyTag, DestructionQueue, RigidBodyWorld, gravity_from_pixels};
use crate::sprites::PlayerAnimations;

/// Countdown on a parkour block the player has touched.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crumbling {
    pub ticks_left: u32,
}

impl Crumbling {
    /// Count one tick. True once the block should go.
    pub fn tick(&mut self) -> bool {
        self.ticks_left = self.ticks_left.saturating_sub(1);
        self.ticks_left == 0
    }
}

fn actor_stats(
    players: &Query<&Health, (With<Player>, Without<Enemy>)>,
    enemies: &Query<&Health, With<Enemy>>,
) -> ActorStats {
    ActorStats {
        player: players.iter().next().cloned(),
        enemy: enemies.iter().next().cloned(),
    }
}

/// Start the level the session asks for: fresh behavior, `on_enter` hook.
pub(crate) fn begin_requested_level(
    tuning: Res<LevelTuning>,
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    mut active: ResMut<ActiveLevel>,
    mut directives: ResMut<LevelDirectives>,
) {
    if !session.is_loading {
        return;
    }
    let Some(index) = session.current_level else {
        session.finish_loading();
        return;
    };

    if index == CREDITS_LEVEL {
        info!("Rolling credits, ending the run");
        session.finish_loading();
        session.quit();
        return;
    }

    let Some(mut behavior) = level_behavior(index, &tuning) else {
        warn!("No level with index {}, returning to menu", index);
        session.return_to_menu();
        return;
    };

    info!("Entering level {} ({})", index, behavior.name());
    let mut ctx = LevelContext::new(&mut session, &mut *sounds, ActorStats::default());
    behavior.on_enter(&mut ctx);
    directives.pending.extend(ctx.into_directives());

    active.index = Some(index);
    active.behavior = Some(behavior);
    active.layout = None;
    session.finish_loading();
}

/// Parkour crumbling and exit detection from contact begin messages.
pub(crate) fn track_block_contacts(
    mut commands: Commands,
    mut contacts: MessageReader<CollisionStart>,
    mut level_events: MessageWriter<LevelEvent>,
    tuning: Res<LevelTuning>,
    blocks: Query<&BodyTag, Without<Crumbling>>,
    players: Query<(), With<Player>>,
) {
    for contact in contacts.read() {
        let block = if players.contains(contact.collider2) {
            contact.collider1
        } else if players.contains(contact.collider1) {
            contact.collider2
        } else {
            continue;
        };

        match blocks.get(block) {
            Ok(BodyTag::Block(BlockKind::Parkour)) => {
                commands.entity(block).insert(Crumbling {
                    ticks_left: tuning.crumble_ticks,
                });
            }
            Ok(BodyTag::Block(BlockKind::Exit)) => {
                info!("Exit reached");
                level_events.write(LevelEvent::ExitReached);
            }
            _ => {}
        }
    }
}

pub(crate) fn tick_crumbling_blocks(
    mut queue: ResMut<DestructionQueue>,
    mut blocks: Query<(Entity, &mut Crumbling)>,
) {
    for (entity, mut crumbling) in &mut blocks {
        if crumbling.tick() && !queue.is_scheduled(entity) {
            debug!("Parkour block {:?} crumbled", entity);
            queue.schedule(entity);
        }
    }
}

pub(crate) fn run_level_tick(
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    mut active: ResMut<ActiveLevel>,
    mut directives: ResMut<LevelDirectives>,
    players: Query<&Health, (With<Player>, Without<Enemy>)>,
    enemies: Query<&Health, With<Enemy>>,
) {
    let stats = actor_stats(&players, &enemies);
    let Some(behavior) = active.behavior.as_mut() else {
        return;
    };
    let mut ctx = LevelContext::new(&mut session, &mut *sounds, stats);
    behavior.on_tick(&mut ctx);
    directives.pending.extend(ctx.into_directives());
}

/// Forward keys that levels care about: digits, R, G and C.
pub(crate) fn read_level_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut level_events: MessageWriter<LevelEvent>,
) {
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    for key in keyboard.get_just_pressed() {
        if matches!(
            key,
            KeyCode::Digit1
                | KeyCode::Digit2
                | KeyCode::Digit3
                | KeyCode::KeyR
                | KeyCode::KeyG
                | KeyCode::KeyC
        ) {
            level_events.write(LevelEvent::KeyPressed { key: *key, ctrl });
        }
    }
}

pub(crate) fn dispatch_level_events(
    mut level_events: MessageReader<LevelEvent>,
    mut session: ResMut<SessionContext>,
    mut sounds: ResMut<SoundQueue>,
    mut active: ResMut<ActiveLevel>,
    mut directives: ResMut<LevelDirectives>,
    players: Query<&Health, (With<Player>, Without<Enemy>)>,
    enemies: Query<&Health, With<Enemy>>,
) {
    let stats = actor_stats(&players, &enemies);
    let Some(behavior) = active.behavior.as_mut() else {
        for _ in level_events.read() {}
        return;
    };
    for event in level_events.read() {
        let mut ctx = LevelContext::new(&mut session, &mut *sounds, stats.clone());
        behavior.on_event(*event, &mut ctx);
        directives.pending.extend(ctx.into_directives());
    }
}

/// Gameplay resources read while building a layout.
#[derive(bevy::ecs::system::SystemParam)]
pub(crate) struct BuildParams<'w> {
    tuning: Res<'w, LevelTuning>,
    combat: Res<'w, CombatTuning>,
    enemy: Res<'w, EnemyTuning>,
    animations: Res<'w, PlayerAnimations>,
    queue: ResMut<'w, DestructionQueue>,
    controls: ResMut<'w, PendingControls>,
    gun_input: ResMut<'w, GunInput>,
    sounds: ResMut<'w, SoundQueue>,
}

pub(crate) fn apply_level_directives(
    mut directives: ResMut<LevelDirectives>,
    mut active: ResMut<ActiveLevel>,
    mut session: ResMut<SessionContext>,
    mut gravity: ResMut<Gravity>,
    mut time: ResMut<Time<Virtual>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut build: BuildParams,
    mut world: AvianWorld,
    level_entities: Query<Entity, With<LevelEntity>>,
) {
    if directives.pending.is_empty() {
        return;
    }

    for directive in std::mem::take(&mut directives.pending) {
        match directive {
            LevelDirective::SetGravity(pixels) => {
                *gravity = gravity_from_pixels(pixels);
            }
            LevelDirective::EnableGun(enabled) => {
                active.gun_enabled = enabled;
            }
            LevelDirective::SetTimeScale(scale) => {
                active.time_scale = scale;
                time.set_relative_speed(scale);
            }
            LevelDirective::LoadLayout(layout) => {
                teardown(&mut world, &level_entities, &mut build, &mut session);
                let built = build_layout(&layout, &active, &mut build, &mut world);
                if let Some(state) = settle_layout(layout, built, &mut active, &mut session) {
                    next_state.set(state);
                }
            }
            LevelDirective::Restart => {
                let Some(layout) = active.layout.clone() else {
                    warn!("Restart requested with no layout loaded");
                    continue;
                };
                info!("Restarting layout {}", layout);
                teardown(&mut world, &level_entities, &mut build, &mut session);
                let built = build_layout(&layout, &active, &mut build, &mut world);
                if let Some(state) = settle_layout(layout, built, &mut active, &mut session) {
                    next_state.set(state);
                }
            }
            LevelDirective::AdvanceLevel => {
                let next = active.index.map_or(0, |index| index + 1);
                info!("Advancing to level {}", next);
                teardown(&mut world, &level_entities, &mut build, &mut session);
                session.set_current_level(next);
            }
            LevelDirective::GoToCredits => {
                teardown(&mut world, &level_entities, &mut build, &mut session);
                session.set_current_level(CREDITS_LEVEL);
            }
            LevelDirective::EndGame(outcome) => {
                info!("Level over: {:?}", outcome);
                silence_locomotion(&mut session, &mut *build.sounds);
                next_state.set(GameState::Ended);
            }
        }
    }
}

/// Record the result of building `layout`. Returns the state to enter, or
/// `None` after sending the session back to the menu.
pub(crate) fn settle_layout(
    layout: String,
    built: bool,
    active: &mut ActiveLevel,
    session: &mut SessionContext,
) -> Option<GameState> {
    if built {
        active.layout = Some(layout);
        return Some(GameState::Playing);
    }
    warn!("Layout {} could not be built, returning to menu", layout);
    active.layout = None;
    session.return_to_menu();
    None
}

fn teardown(
    world: &mut AvianWorld,
    level_entities: &Query<Entity, With<LevelEntity>>,
    build: &mut BuildParams,
    session: &mut SessionContext,
) {
    for entity in level_entities {
        world.destroy_body(entity);
    }
    build.queue.clear();
    build.controls.events.clear();
    build.gun_input.take_requests();
    silence_locomotion(session, &mut *build.sounds);
}

/// Read `<levels_dir>/<layout>.txt`, logging why it failed.
pub(crate) fn read_layout(levels_dir: &str, layout: &str) -> Option<LevelGrid> {
    let path = Path::new(levels_dir).join(format!("{}.txt", layout));
    match load_level(&path) {
        Ok(grid) => Some(grid),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

/// Load and spawn a layout. False when the file could not be read.
fn build_layout(
    layout: &str,
    active: &ActiveLevel,
    build: &mut BuildParams,
    world: &mut AvianWorld,
) -> bool {
    let Some(grid) = read_layout(&build.tuning.levels_dir, layout) else {
        return false;
    };

    let settings = ActorSettings {
        player_half_extents: Vec2::from(build.tuning.player_half_extents),
        gun_enabled: active.gun_enabled,
        combat: &build.combat,
        enemy: &build.enemy,
        animations: &build.animations,
    };
    let bodies = spawn_level(world, &grid, &settings);

    if bodies.player.is_none() {
        warn!("Layout {} has no player spawn", layout);
    }
    info!(
        "Built layout {} ({} blocks, enemy: {})",
        layout,
        bodies.blocks.len(),
        bodies.enemy.is_some()
    );
    true
}
