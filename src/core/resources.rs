//! Core domain: session-wide resources threaded through the update loop.

use bevy::prelude::*;
use rand::Rng;

/// Process-wide session flags, owned by the app instead of globals.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub running: bool,
    pub current_level: Option<usize>,
    pub is_menu: bool,
    pub is_loading: bool,
    pub walking_sound_playing: bool,
    pub dash_sound_playing: bool,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            running: true,
            current_level: None,
            is_menu: false,
            is_loading: false,
            walking_sound_playing: false,
            dash_sound_playing: false,
        }
    }
}

impl SessionContext {
    /// Switch levels. The level is built on the next frame.
    pub fn set_current_level(&mut self, level: usize) {
        self.current_level = Some(level);
        self.is_loading = true;
        self.is_menu = false;
        self.walking_sound_playing = false;
        self.dash_sound_playing = false;
    }

    pub fn finish_loading(&mut self) {
        self.is_loading = false;
    }

    /// Leave gameplay after a failed level load.
    pub fn return_to_menu(&mut self) {
        self.current_level = None;
        self.is_loading = false;
        self.is_menu = true;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}

/// Render-space size in pixels. Screen wrap and projectile bounds use it.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub size: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Vec2::new(1280.0, 720.0),
        }
    }
}

impl Viewport {
    pub fn bounds(&self) -> Rect {
        Rect::from_corners(Vec2::ZERO, self.size)
    }
}

#[derive(Resource, Debug)]
pub struct RunConfig {
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
        }
    }
}
