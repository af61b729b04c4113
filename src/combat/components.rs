//! Combat domain: health, guns and projectiles.
//!
//! Everything here lives in render space: pixels, top-left origin, y down.

use bevy::prelude::*;

/// Health component for damageable actors.
///
/// `current` stays in `[0, max]`; only `heal` and `reset` raise it.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.current);
        self.current -= actual;
        actual
    }

    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.max - self.current);
        self.current += actual;
        actual
    }

    pub fn reset(&mut self) {
        self.current = self.max;
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }

    /// Fraction of max health in `[0, 1]`. Zero when `max` is zero.
    pub fn fraction(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }
}

/// Marks the boss-level enemy.
#[derive(Component, Debug)]
pub struct Enemy;

/// A bullet. Moves `speed` pixels per tick along `angle_deg`.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec2,
    pub angle_deg: f32,
    pub speed: f32,
    pub size: Vec2,
}

impl Projectile {
    pub fn new(position: Vec2, angle_deg: f32, speed: f32, size: Vec2) -> Self {
        Self {
            position,
            angle_deg,
            speed,
            size,
        }
    }

    /// Per-tick displacement.
    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle_deg.to_radians()) * self.speed
    }

    pub fn advance(&mut self) {
        self.position += self.velocity();
    }

    pub fn out_of_bounds(&self, bounds: Rect) -> bool {
        !bounds.contains(self.position)
    }

    /// Axis-aligned box around the bullet centre, ignoring rotation.
    pub fn aabb(&self) -> Rect {
        Rect::from_center_size(self.position, self.size)
    }
}

/// Bullets fired by one actor. Nothing else holds them.
#[derive(Component, Debug, Default)]
pub struct Projectiles(pub Vec<Projectile>);

impl Projectiles {
    /// Move every bullet one tick and drop those that left `bounds`.
    pub fn advance(&mut self, bounds: Rect) {
        for bullet in &mut self.0 {
            bullet.advance();
        }
        self.0.retain(|bullet| !bullet.out_of_bounds(bounds));
    }
}

/// Angle in degrees from `from` towards `to`.
pub fn aim_angle(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x).to_degrees()
}

/// Player gun: capped ammo, fire cooldown and a toggleable reload.
#[derive(Component, Debug, Clone)]
pub struct Gun {
    /// Only levels that allow shooting turn the gun on.
    pub enabled: bool,
    pub ammo: u32,
    pub max_ammo: u32,
    pub fire_timer: u32,
    pub fire_rate: u32,
    pub reloading: bool,
    pub reload_timer: u32,
    pub reload_rate: u32,
    /// Distance from the actor centre to the muzzle.
    pub gap: f32,
    pub bullet_speed: f32,
    pub bullet_size: Vec2,
}

impl Gun {
    pub fn from_tuning(tuning: &crate::combat::CombatTuning) -> Self {
        Self {
            enabled: false,
            ammo: tuning.max_ammo,
            max_ammo: tuning.max_ammo,
            fire_timer: 0,
            fire_rate: tuning.fire_rate,
            reloading: false,
            reload_timer: tuning.reload_rate,
            reload_rate: tuning.reload_rate,
            gap: tuning.gun_gap,
            bullet_speed: tuning.bullet_speed,
            bullet_size: Vec2::from(tuning.bullet_size),
        }
    }

    pub fn toggle_reload(&mut self) {
        self.reloading = !self.reloading;
        if self.reloading {
            self.reload_timer = self.reload_rate;
        }
    }

    /// Per-tick timers: fire cooldown and one step of reload.
    pub fn tick(&mut self) {
        self.fire_timer = self.fire_timer.saturating_sub(1);

        if !self.reloading {
            return;
        }
        if self.ammo < self.max_ammo {
            self.reload_timer = self.reload_timer.saturating_sub(1);
            if self.reload_timer == 0 {
                self.ammo += 1;
                self.reload_timer = self.reload_rate;
            }
        }
        if self.ammo >= self.max_ammo {
            self.reloading = false;
        }
    }

    /// Fire towards `target` if the cooldown has run out and a round is left.
    pub fn try_fire(&mut self, origin: Vec2, target: Vec2) -> Option<Projectile> {
        if !self.enabled || self.fire_timer > 0 || self.ammo == 0 {
            return None;
        }

        self.fire_timer = self.fire_rate;
        self.ammo -= 1;
        Some(muzzle_shot(
            origin,
            target,
            self.gap,
            self.bullet_speed,
            self.bullet_size,
        ))
    }
}

/// Bullet spawned `gap` pixels from `origin` along the aim line.
pub fn muzzle_shot(origin: Vec2, target: Vec2, gap: f32, speed: f32, size: Vec2) -> Projectile {
    let angle = aim_angle(origin, target);
    let muzzle = origin + Vec2::from_angle(angle.to_radians()) * gap;
    Projectile::new(muzzle, angle, speed, size)
}
