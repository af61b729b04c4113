//! Level domain: per-level rules as pluggable behaviors.
//!
//! A level's shared machinery (grid, bodies, crumbling, exits) lives in the
//! level systems. What differs between levels (music, gravity, win and lose
//! conditions, special keys) is a `LevelBehavior` that reacts to hooks and
//! answers with `LevelDirective`s for the systems to carry out.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::audio::SoundPlayer;
use crate::combat::Health;
use crate::core::SessionContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Something that happened in the level that a behavior may react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelEvent {
    /// The player touched an exit sensor.
    ExitReached,
    KeyPressed { key: KeyCode, ctrl: bool },
}

impl Message for LevelEvent {}

/// Requests a behavior makes of the level systems.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelDirective {
    /// Tear down and build the layout in `assets/levels/<name>.txt`.
    LoadLayout(String),
    /// Downward gravity in pixels per second squared.
    SetGravity(f32),
    EnableGun(bool),
    SetTimeScale(f32),
    /// Rebuild the current layout with fresh actors.
    Restart,
    AdvanceLevel,
    GoToCredits,
    EndGame(Outcome),
}

/// Actor health snapshot taken before a hook runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActorStats {
    pub player: Option<Health>,
    pub enemy: Option<Health>,
}

impl ActorStats {
    pub fn player_fraction(&self) -> Option<f32> {
        self.player.as_ref().map(Health::fraction)
    }

    pub fn player_dead(&self) -> bool {
        self.player.as_ref().is_some_and(Health::is_dead)
    }

    pub fn enemy_dead(&self) -> bool {
        self.enemy.as_ref().is_some_and(Health::is_dead)
    }
}

/// What a behavior hook can see and touch.
pub struct LevelContext<'a> {
    pub session: &'a mut SessionContext,
    pub sounds: &'a mut dyn SoundPlayer,
    pub stats: ActorStats,
    directives: Vec<LevelDirective>,
}

impl<'a> LevelContext<'a> {
    pub fn new(
        session: &'a mut SessionContext,
        sounds: &'a mut dyn SoundPlayer,
        stats: ActorStats,
    ) -> Self {
        Self {
            session,
            sounds,
            stats,
            directives: Vec::new(),
        }
    }

    pub fn push(&mut self, directive: LevelDirective) {
        self.directives.push(directive);
    }

    pub fn directives(&self) -> &[LevelDirective] {
        &self.directives
    }

    pub fn into_directives(self) -> Vec<LevelDirective> {
        self.directives
    }
}

pub trait LevelBehavior: Send + Sync {
    fn name(&self) -> &str;

    /// Called once when the level starts.
    fn on_enter(&mut self, ctx: &mut LevelContext);

    /// Called every fixed tick while the level is being played.
    fn on_tick(&mut self, _ctx: &mut LevelContext) {}

    fn on_event(&mut self, _event: LevelEvent, _ctx: &mut LevelContext) {}

    /// Final result, once the level has one.
    fn outcome(&self) -> Option<Outcome> {
        None
    }
}
