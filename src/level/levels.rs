//! Level domain: the level catalogue.

use bevy::prelude::*;

use super::behavior::{LevelBehavior, LevelContext, LevelDirective, LevelEvent, Outcome};
use super::resources::LevelTuning;

/// Session level index that rolls the credits and ends the run.
pub const CREDITS_LEVEL: usize = 99;

pub const PARKOUR_DIFFICULTIES: u8 = 3;

/// Plain traversal: reach the exit to move on.
pub struct PlatformLevel {
    name: &'static str,
    layout: &'static str,
    gravity: f32,
    music: Option<(&'static str, f32)>,
}

impl PlatformLevel {
    pub fn new(name: &'static str, layout: &'static str, gravity: f32) -> Self {
        Self {
            name,
            layout,
            gravity,
            music: None,
        }
    }

    pub fn with_music(mut self, track: &'static str, volume: f32) -> Self {
        self.music = Some((track, volume));
        self
    }
}

impl LevelBehavior for PlatformLevel {
    fn name(&self) -> &str {
        self.name
    }

    fn on_enter(&mut self, ctx: &mut LevelContext) {
        if let Some((track, volume)) = self.music {
            ctx.sounds.play_music(track, true, volume);
        }
        ctx.push(LevelDirective::SetGravity(self.gravity));
        ctx.push(LevelDirective::EnableGun(false));
        ctx.push(LevelDirective::SetTimeScale(1.0));
        ctx.push(LevelDirective::LoadLayout(self.layout.to_string()));
    }

    fn on_event(&mut self, event: LevelEvent, ctx: &mut LevelContext) {
        if event == LevelEvent::ExitReached {
            ctx.push(LevelDirective::AdvanceLevel);
        }
    }
}

/// Three crumbling-platform courses played in a row.
pub struct ParkourLevel {
    difficulty: u8,
    gravity: f32,
}

impl ParkourLevel {
    pub fn new(gravity: f32) -> Self {
        Self {
            difficulty: 1,
            gravity,
        }
    }

    fn layout(&self) -> String {
        format!("hard_parkour_{}", self.difficulty)
    }

    fn load_difficulty(&mut self, difficulty: u8, ctx: &mut LevelContext) {
        self.difficulty = difficulty;
        info!("Parkour difficulty {}", difficulty);
        ctx.push(LevelDirective::LoadLayout(self.layout()));
    }
}

impl LevelBehavior for ParkourLevel {
    fn name(&self) -> &str {
        "parkour"
    }

    fn on_enter(&mut self, ctx: &mut LevelContext) {
        ctx.push(LevelDirective::SetGravity(self.gravity));
        ctx.push(LevelDirective::EnableGun(false));
        ctx.push(LevelDirective::SetTimeScale(1.0));
        ctx.push(LevelDirective::LoadLayout(self.layout()));
    }

    fn on_event(&mut self, event: LevelEvent, ctx: &mut LevelContext) {
        match event {
            LevelEvent::ExitReached if self.difficulty < PARKOUR_DIFFICULTIES => {
                self.load_difficulty(self.difficulty + 1, ctx);
            }
            LevelEvent::ExitReached => ctx.push(LevelDirective::AdvanceLevel),
            LevelEvent::KeyPressed {
                key: KeyCode::KeyR,
                ctrl: true,
            } => ctx.push(LevelDirective::Restart),
            LevelEvent::KeyPressed { key, .. } => {
                let difficulty = match key {
                    KeyCode::Digit1 => 1,
                    KeyCode::Digit2 => 2,
                    KeyCode::Digit3 => 3,
                    _ => return,
                };
                self.load_difficulty(difficulty, ctx);
            }
        }
    }
}

/// The boss fight: shoot the enemy down before it does the same to you.
pub struct BossLevel {
    gravity: f32,
    music_volume: f32,
    slow_motion_scale: f32,
    slow_motion_threshold: f32,
    outcome: Option<Outcome>,
    slowed: bool,
}

impl BossLevel {
    pub fn new(tuning: &LevelTuning) -> Self {
        Self {
            gravity: tuning.gravity,
            music_volume: tuning.music_volume,
            slow_motion_scale: tuning.slow_motion_scale,
            slow_motion_threshold: tuning.slow_motion_threshold,
            outcome: None,
            slowed: false,
        }
    }

    fn finish(&mut self, outcome: Outcome, ctx: &mut LevelContext) {
        self.outcome = Some(outcome);
        if self.slowed {
            self.slowed = false;
            ctx.push(LevelDirective::SetTimeScale(1.0));
        }
        ctx.push(LevelDirective::EndGame(outcome));
    }
}

impl LevelBehavior for BossLevel {
    fn name(&self) -> &str {
        "boss"
    }

    fn on_enter(&mut self, ctx: &mut LevelContext) {
        ctx.sounds.play_music("boss", true, self.music_volume);
        ctx.push(LevelDirective::SetGravity(self.gravity));
        ctx.push(LevelDirective::EnableGun(true));
        ctx.push(LevelDirective::SetTimeScale(1.0));
        ctx.push(LevelDirective::LoadLayout("last".to_string()));
    }

    fn on_tick(&mut self, ctx: &mut LevelContext) {
        if self.outcome.is_some() {
            return;
        }
        if ctx.stats.player_dead() {
            info!("Player defeated");
            self.finish(Outcome::Lost, ctx);
            return;
        }
        if ctx.stats.enemy_dead() {
            info!("Enemy defeated");
            self.finish(Outcome::Won, ctx);
            return;
        }

        let wounded = ctx
            .stats
            .player_fraction()
            .is_some_and(|h| h < self.slow_motion_threshold);
        if wounded != self.slowed {
            self.slowed = wounded;
            let scale = if wounded { self.slow_motion_scale } else { 1.0 };
            ctx.push(LevelDirective::SetTimeScale(scale));
        }
    }

    fn on_event(&mut self, event: LevelEvent, ctx: &mut LevelContext) {
        let LevelEvent::KeyPressed { key, .. } = event else {
            return;
        };
        match (self.outcome, key) {
            (Some(Outcome::Lost), KeyCode::KeyG) => {
                info!("Restarting boss fight");
                self.outcome = None;
                ctx.push(LevelDirective::Restart);
            }
            (Some(Outcome::Won), KeyCode::KeyC) => ctx.push(LevelDirective::GoToCredits),
            _ => {}
        }
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// Behavior for a session level index. `None` for indices with no level.
pub fn level_behavior(index: usize, tuning: &LevelTuning) -> Option<Box<dyn LevelBehavior>> {
    let behavior: Box<dyn LevelBehavior> = match index {
        0 => Box::new(
            PlatformLevel::new("one", "level_one", tuning.gravity)
                .with_music("la_fiola", tuning.music_volume),
        ),
        1 => Box::new(
            PlatformLevel::new("maze", "maze", tuning.low_gravity)
                .with_music("amicitia", tuning.music_volume),
        ),
        2 => Box::new(ParkourLevel::new(tuning.low_gravity)),
        3 => Box::new(BossLevel::new(tuning)),
        _ => return None,
    };
    Some(behavior)
}
