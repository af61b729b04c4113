use bevy::prelude::*;

use super::*;
use crate::audio::SoundPlayer;
use crate::combat::Health;
use super::systems::{read_layout, settle_layout};
use crate::core::{GameState, SessionContext};
use crate::physics::testing::ScriptedWorld;
use crate::physics::{RigidBodyWorld, SteppedWorld, to_pixels};

#[derive(Default)]
struct Recorder {
    music: Vec<String>,
}

impl SoundPlayer for Recorder {
    fn play_sound(&mut self, _name: &str, _looping: bool, _volume: f32) {}

    fn stop_sound(&mut self, _name: &str) {}

    fn play_music(&mut self, name: &str, _looping: bool, _volume: f32) {
        self.music.push(name.to_string());
    }

    fn stop_music(&mut self) {}
}

fn enter(behavior: &mut dyn LevelBehavior, sounds: &mut Recorder) -> Vec<LevelDirective> {
    let mut session = SessionContext::default();
    let mut ctx = LevelContext::new(&mut session, sounds, ActorStats::default());
    behavior.on_enter(&mut ctx);
    ctx.into_directives()
}

fn send(behavior: &mut dyn LevelBehavior, event: LevelEvent) -> Vec<LevelDirective> {
    let mut session = SessionContext::default();
    let mut sounds = Recorder::default();
    let mut ctx = LevelContext::new(&mut session, &mut sounds, ActorStats::default());
    behavior.on_event(event, &mut ctx);
    ctx.into_directives()
}

fn tick(behavior: &mut dyn LevelBehavior, stats: ActorStats) -> Vec<LevelDirective> {
    let mut session = SessionContext::default();
    let mut sounds = Recorder::default();
    let mut ctx = LevelContext::new(&mut session, &mut sounds, stats);
    behavior.on_tick(&mut ctx);
    ctx.into_directives()
}

fn key(key: KeyCode) -> LevelEvent {
    LevelEvent::KeyPressed { key, ctrl: false }
}

fn health(current: i32, max: i32) -> Health {
    let mut health = Health::new(max);
    health.take_damage(max - current);
    health
}

fn stats(player: Health, enemy: Health) -> ActorStats {
    ActorStats {
        player: Some(player),
        enemy: Some(enemy),
    }
}

// ---- grid ----

#[test]
fn test_grid_parses_known_symbols_and_skips_others() {
    let grid = LevelGrid::parse("D.m?\n p eE\nP   ");
    assert_eq!(grid.rows, 3);
    assert_eq!(grid.columns, 5);
    assert_eq!(grid.cells.len(), 6);
    assert_eq!(grid.blocks().count(), 4);
    assert_eq!(grid.player_spawn(), Some(cell_center(2, 0)));
    assert_eq!(grid.enemy_spawn(), Some(cell_center(1, 4)));
}

#[test]
fn test_cell_centre_scales_by_tile_size() {
    assert_eq!(cell_center(0, 0), Vec2::splat(TILE_SIZE / 2.0));
    assert_eq!(
        cell_center(2, 3),
        Vec2::new(3.5 * TILE_SIZE, 2.5 * TILE_SIZE)
    );
}

#[test]
fn test_grid_ignores_rows_past_limit() {
    let text = "D\n".repeat(MAX_ROWS + 5);
    let grid = LevelGrid::parse(&text);
    assert_eq!(grid.rows, MAX_ROWS);
    assert_eq!(grid.blocks().count(), MAX_ROWS);
}

#[test]
fn test_missing_level_file_is_an_error() {
    let result = load_level(std::path::Path::new("assets/levels/does_not_exist.txt"));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("does_not_exist"));
}

#[test]
fn test_shipped_layouts_have_player_spawns() {
    for name in [
        "level_one",
        "maze",
        "hard_parkour_1",
        "hard_parkour_2",
        "hard_parkour_3",
        "last",
    ] {
        let path = std::path::Path::new("assets/levels").join(format!("{name}.txt"));
        let grid = load_level(&path).unwrap();
        assert!(grid.player_spawn().is_some(), "{name} has no player");
        assert!(grid.blocks().count() > 0, "{name} has no blocks");
    }
}

#[test]
fn test_block_properties() {
    assert!(BlockKind::Ice.friction() < BlockKind::Dirt.friction());
    assert!(BlockKind::Exit.is_sensor());
    assert!(!BlockKind::Parkour.is_sensor());
    assert_eq!(BlockKind::from_symbol('p'), Some(BlockKind::Parkour));
    assert_eq!(BlockKind::from_symbol('P'), None);
}

// ---- building ----

#[test]
fn test_build_bodies_places_blocks_and_actors() {
    let grid = LevelGrid::parse("....\n.P.E\nDDme");
    let mut world = ScriptedWorld::new(Vec2::new(0.0, -20.0));

    let bodies = build_bodies(&mut world, &grid, Vec2::new(20.0, 30.0), Vec2::splat(40.0));

    assert_eq!(bodies.blocks.len(), 4);
    assert_eq!(world.body_count(), 6);

    let player = bodies.player.unwrap();
    let position = to_pixels(world.body_state(player).unwrap().position);
    assert!((position - cell_center(1, 1)).length() < 1e-3);

    let enemy = bodies.enemy.unwrap();
    let position = to_pixels(world.body_state(enemy).unwrap().position);
    assert!((position - cell_center(1, 3)).length() < 1e-3);

    let (exit, kind) = bodies.blocks[3];
    assert_eq!(kind, BlockKind::Exit);
    assert!(world.contains(exit));
}

#[test]
fn test_player_lands_on_built_floor() {
    let grid = LevelGrid::parse("P\n.\nD");
    let mut world = ScriptedWorld::new(Vec2::new(0.0, -20.0));
    let bodies = build_bodies(&mut world, &grid, Vec2::new(20.0, 30.0), Vec2::splat(40.0));
    let player = bodies.player.unwrap();

    world.run_ticks(120);

    let feet = to_pixels(world.body_state(player).unwrap().position).y + 30.0;
    let floor_top = cell_center(2, 0).y - TILE_SIZE / 2.0;
    assert!((feet - floor_top).abs() < 1.0);
}

#[test]
fn test_layout_without_actors_builds_only_blocks() {
    let grid = LevelGrid::parse("DDD");
    let mut world = ScriptedWorld::new(Vec2::ZERO);
    let bodies = build_bodies(&mut world, &grid, Vec2::splat(20.0), Vec2::splat(40.0));
    assert!(bodies.player.is_none());
    assert!(bodies.enemy.is_none());
    assert_eq!(world.body_count(), 3);
}

// ---- crumbling ----

#[test]
fn test_crumbling_counts_down_to_removal() {
    let mut crumbling = Crumbling { ticks_left: 45 };
    for _ in 0..44 {
        assert!(!crumbling.tick());
    }
    assert!(crumbling.tick());
    assert!(crumbling.tick());
}

#[test]
fn test_crumbled_block_leaves_world_after_drain() {
    let grid = LevelGrid::parse("p");
    let mut world = ScriptedWorld::new(Vec2::ZERO);
    let bodies = build_bodies(&mut world, &grid, Vec2::splat(20.0), Vec2::splat(40.0));
    let (block, kind) = bodies.blocks[0];
    assert_eq!(kind, BlockKind::Parkour);

    let mut queue = crate::physics::DestructionQueue::default();
    let mut crumbling = Crumbling { ticks_left: 2 };
    while !crumbling.tick() {
        world.step(1.0 / 60.0);
    }
    queue.schedule(block);
    world.step(1.0 / 60.0);
    assert!(world.contains(block));

    queue.drain_into(&mut world);
    assert!(!world.contains(block));
}

// ---- lifecycle ----

#[test]
fn test_restart_with_missing_layout_returns_to_menu() {
    let tuning = LevelTuning::default();
    let mut session = SessionContext::default();
    session.set_current_level(3);
    session.finish_loading();
    let mut active = ActiveLevel {
        index: Some(3),
        layout: Some("last".to_string()),
        ..Default::default()
    };

    let built = read_layout(&tuning.levels_dir, "no_such_layout").is_some();
    let next = settle_layout("no_such_layout".to_string(), built, &mut active, &mut session);

    assert_eq!(next, None);
    assert_eq!(active.layout, None);
    assert!(session.is_menu);
    assert_eq!(session.current_level, None);
}

#[test]
fn test_built_layout_is_kept_for_restarts() {
    let tuning = LevelTuning::default();
    let mut session = SessionContext::default();
    let mut active = ActiveLevel::default();

    let built = read_layout(&tuning.levels_dir, "maze").is_some();
    let next = settle_layout("maze".to_string(), built, &mut active, &mut session);

    assert_eq!(next, Some(GameState::Playing));
    assert_eq!(active.layout.as_deref(), Some("maze"));
    assert!(!session.is_menu);
}

// ---- behaviors ----

#[test]
fn test_catalogue_covers_four_levels() {
    let tuning = LevelTuning::default();
    let names: Vec<String> = (0..4)
        .map(|i| level_behavior(i, &tuning).unwrap().name().to_string())
        .collect();
    assert_eq!(names, ["one", "maze", "parkour", "boss"]);
    assert!(level_behavior(4, &tuning).is_none());
    assert!(level_behavior(CREDITS_LEVEL, &tuning).is_none());
}

#[test]
fn test_first_level_plays_its_own_track() {
    let mut level = level_behavior(0, &LevelTuning::default()).unwrap();
    let mut sounds = Recorder::default();
    enter(level.as_mut(), &mut sounds);
    assert_eq!(sounds.music, ["la_fiola"]);
}

#[test]
fn test_platform_level_enters_and_advances_on_exit() {
    let tuning = LevelTuning::default();
    let mut level = level_behavior(1, &tuning).unwrap();
    let mut sounds = Recorder::default();

    let directives = enter(level.as_mut(), &mut sounds);
    assert_eq!(sounds.music, ["amicitia"]);
    assert!(directives.contains(&LevelDirective::SetGravity(tuning.low_gravity)));
    assert!(directives.contains(&LevelDirective::EnableGun(false)));
    assert_eq!(
        directives.last(),
        Some(&LevelDirective::LoadLayout("maze".to_string()))
    );

    assert_eq!(
        send(level.as_mut(), LevelEvent::ExitReached),
        [LevelDirective::AdvanceLevel]
    );
    assert!(send(level.as_mut(), key(KeyCode::KeyG)).is_empty());
}

#[test]
fn test_parkour_walks_difficulties_then_advances() {
    let mut level = ParkourLevel::new(1000.0);
    let mut sounds = Recorder::default();
    let directives = enter(&mut level, &mut sounds);
    assert!(directives.contains(&LevelDirective::LoadLayout("hard_parkour_1".to_string())));

    assert_eq!(
        send(&mut level, LevelEvent::ExitReached),
        [LevelDirective::LoadLayout("hard_parkour_2".to_string())]
    );
    assert_eq!(
        send(&mut level, LevelEvent::ExitReached),
        [LevelDirective::LoadLayout("hard_parkour_3".to_string())]
    );
    assert_eq!(
        send(&mut level, LevelEvent::ExitReached),
        [LevelDirective::AdvanceLevel]
    );
}

#[test]
fn test_parkour_keys_pick_difficulty_and_restart() {
    let mut level = ParkourLevel::new(1000.0);

    assert_eq!(
        send(&mut level, key(KeyCode::Digit3)),
        [LevelDirective::LoadLayout("hard_parkour_3".to_string())]
    );
    assert_eq!(
        send(&mut level, LevelEvent::ExitReached),
        [LevelDirective::AdvanceLevel]
    );

    assert_eq!(
        send(
            &mut level,
            LevelEvent::KeyPressed {
                key: KeyCode::KeyR,
                ctrl: true
            }
        ),
        [LevelDirective::Restart]
    );
    assert!(send(&mut level, key(KeyCode::KeyR)).is_empty());
    assert!(send(&mut level, key(KeyCode::KeyC)).is_empty());
}

#[test]
fn test_boss_enables_gun_and_plays_music() {
    let mut level = BossLevel::new(&LevelTuning::default());
    let mut sounds = Recorder::default();
    let directives = enter(&mut level, &mut sounds);

    assert!(directives.contains(&LevelDirective::EnableGun(true)));
    assert!(directives.contains(&LevelDirective::LoadLayout("last".to_string())));
    assert_eq!(sounds.music, ["boss"]);
}

#[test]
fn test_boss_slows_time_while_player_is_wounded() {
    let tuning = LevelTuning::default();
    let mut level = BossLevel::new(&tuning);

    assert!(tick(&mut level, stats(health(100, 100), health(400, 400))).is_empty());
    assert_eq!(
        tick(&mut level, stats(health(40, 100), health(400, 400))),
        [LevelDirective::SetTimeScale(tuning.slow_motion_scale)]
    );
    assert!(tick(&mut level, stats(health(30, 100), health(400, 400))).is_empty());
    assert_eq!(
        tick(&mut level, stats(health(60, 100), health(400, 400))),
        [LevelDirective::SetTimeScale(1.0)]
    );
}

#[test]
fn test_boss_loss_then_restart_with_g() {
    let mut level = BossLevel::new(&LevelTuning::default());

    tick(&mut level, stats(health(30, 100), health(400, 400)));
    let directives = tick(&mut level, stats(health(0, 100), health(400, 400)));
    assert_eq!(
        directives,
        [
            LevelDirective::SetTimeScale(1.0),
            LevelDirective::EndGame(Outcome::Lost)
        ]
    );
    assert_eq!(level.outcome(), Some(Outcome::Lost));

    // Nothing more happens until the player reacts.
    assert!(tick(&mut level, stats(health(0, 100), health(400, 400))).is_empty());
    assert!(send(&mut level, key(KeyCode::KeyC)).is_empty());

    assert_eq!(send(&mut level, key(KeyCode::KeyG)), [LevelDirective::Restart]);
    assert_eq!(level.outcome(), None);
}

#[test]
fn test_boss_win_then_credits_with_c() {
    let mut level = BossLevel::new(&LevelTuning::default());

    let directives = tick(&mut level, stats(health(80, 100), health(0, 400)));
    assert_eq!(directives, [LevelDirective::EndGame(Outcome::Won)]);

    assert!(send(&mut level, key(KeyCode::KeyG)).is_empty());
    assert_eq!(
        send(&mut level, key(KeyCode::KeyC)),
        [LevelDirective::GoToCredits]
    );
}

#[test]
fn test_boss_without_actors_never_ends() {
    let mut level = BossLevel::new(&LevelTuning::default());
    for _ in 0..10 {
        assert!(tick(&mut level, ActorStats::default()).is_empty());
    }
    assert_eq!(level.outcome(), None);
}
