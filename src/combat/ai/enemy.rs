//! Combat domain: boss-level enemy AI.
//!
//! Above half health the enemy holds its spawn point and only dodges. Below
//! half it picks a flight pattern at random and re-picks on a timer that
//! shortens as it loses health. Fire rate speeds up the same way.

use bevy::prelude::*;
use rand::Rng;

use crate::combat::components::{Enemy, Health, Projectile, Projectiles, muzzle_shot};
use crate::combat::resources::{CombatRng, EnemyTuning};
use crate::core::Viewport;
use crate::movement::Player;
use crate::physics::{AvianWorld, RigidBodyWorld, to_physics, to_pixels};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPattern {
    /// Calm: stay at the spawn point.
    Hold,
    HorizontalPatrol,
    Orbit,
    ApproachRetreat,
}

const AGGRESSIVE_PATTERNS: [FlightPattern; 3] = [
    FlightPattern::HorizontalPatrol,
    FlightPattern::Orbit,
    FlightPattern::ApproachRetreat,
];

/// Health fraction mapped into `[0, 1]`, NaN treated as empty.
fn sanitize(health_fraction: f32) -> f32 {
    if health_fraction.is_nan() {
        0.0
    } else {
        health_fraction.clamp(0.0, 1.0)
    }
}

/// Ticks between enemy shots. Lower means faster; never below the floor.
pub fn fire_rate(health_fraction: f32, tuning: &EnemyTuning) -> f32 {
    let h = sanitize(health_fraction);
    (tuning.base_fire_rate * (0.25 + 0.75 * h)).max(tuning.min_fire_rate)
}

/// Ticks before the next pattern re-selection.
pub fn pattern_interval(health_fraction: f32, tuning: &EnemyTuning) -> u32 {
    let h = sanitize(health_fraction);
    (tuning.pattern_interval * (0.3 + 0.7 * h)).round().max(1.0) as u32
}

fn step_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let delta = to - from;
    let distance = delta.length();
    if distance <= max_step || distance <= f32::EPSILON {
        to
    } else {
        from + delta / distance * max_step
    }
}

/// Clamp without asserting `min <= max`, so a degenerate arena just pins.
fn clamp_to(area: Rect, point: Vec2) -> Vec2 {
    point.max(area.min).min(area.max)
}

/// What the enemy can see this tick.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    /// Player centre, if a player is linked and alive in the world.
    pub target: Option<Vec2>,
    /// Player bullets in flight.
    pub threats: &'a [Projectile],
    pub bounds: Rect,
}

/// What the enemy does this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyAction {
    pub position: Vec2,
    pub shot: Option<Projectile>,
}

#[derive(Component, Debug, Clone)]
pub struct EnemyAi {
    /// The player being fought. Without one the AI does nothing.
    pub target: Option<Entity>,
    pub home: Vec2,
    pub pattern: FlightPattern,
    pub pattern_timer: u32,
    pub aggressive: bool,
    pub fire_timer: f32,
    pub fire_rate: f32,
    orbit_angle: f32,
    patrol_direction: f32,
    retreating: bool,
}

impl EnemyAi {
    pub fn new(home: Vec2, tuning: &EnemyTuning) -> Self {
        let rate = fire_rate(1.0, tuning);
        Self {
            target: None,
            home,
            pattern: FlightPattern::Hold,
            pattern_timer: 0,
            aggressive: false,
            fire_timer: rate,
            fire_rate: rate,
            orbit_angle: 0.0,
            patrol_direction: 1.0,
            retreating: false,
        }
    }

    /// One AI tick. All positions are in render space.
    pub fn think(
        &mut self,
        position: Vec2,
        health_fraction: f32,
        surroundings: Surroundings<'_>,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> EnemyAction {
        let Some(target) = surroundings.target else {
            return EnemyAction {
                position,
                shot: None,
            };
        };

        let h = sanitize(health_fraction);
        self.fire_rate = fire_rate(h, tuning);
        self.aggressive = h < 0.5;

        let arena = surroundings.bounds.inflate(-tuning.bounds_margin);

        let mut next = if self.aggressive {
            self.fly(position, h, target, arena, tuning, rng)
        } else {
            self.pattern = FlightPattern::Hold;
            step_towards(position, self.home, tuning.return_speed)
        };

        next += self.dodge(next, surroundings.threats, tuning, rng);
        let next = clamp_to(arena, next);

        EnemyAction {
            position: next,
            shot: self.fire(next, target, tuning),
        }
    }

    fn fly(
        &mut self,
        position: Vec2,
        h: f32,
        target: Vec2,
        arena: Rect,
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Vec2 {
        self.pattern_timer = self.pattern_timer.saturating_sub(1);
        if self.pattern_timer == 0 || self.pattern == FlightPattern::Hold {
            let choice = AGGRESSIVE_PATTERNS[rng.random_range(0..AGGRESSIVE_PATTERNS.len())];
            self.select_pattern(choice, position, target);
            self.pattern_timer = pattern_interval(h, tuning);
        }

        let speed = tuning.pattern_speed * (1.0 - h);
        match self.pattern {
            FlightPattern::Hold => position,
            FlightPattern::HorizontalPatrol => {
                let mut next = position;
                next.x += self.patrol_direction * speed;
                if next.x <= arena.min.x {
                    self.patrol_direction = 1.0;
                } else if next.x >= arena.max.x {
                    self.patrol_direction = -1.0;
                }
                next.y += (self.home.y - position.y).clamp(-speed * 0.5, speed * 0.5);
                next
            }
            FlightPattern::Orbit => {
                if tuning.orbit_radius > 0.0 {
                    self.orbit_angle += speed / tuning.orbit_radius;
                }
                let goal = target + Vec2::from_angle(self.orbit_angle) * tuning.orbit_radius;
                step_towards(position, goal, speed * 2.0)
            }
            FlightPattern::ApproachRetreat => {
                let distance = position.distance(target);
                if distance < tuning.approach_min {
                    self.retreating = true;
                } else if distance > tuning.approach_max {
                    self.retreating = false;
                }
                let toward = (target - position).normalize_or_zero();
                let sign = if self.retreating { -1.0 } else { 1.0 };
                position + toward * sign * speed
            }
        }
    }

    fn select_pattern(&mut self, pattern: FlightPattern, position: Vec2, target: Vec2) {
        if pattern != self.pattern {
            debug!("Enemy switches to {:?}", pattern);
        }
        self.pattern = pattern;
        let offset = position - target;
        self.orbit_angle = offset.y.atan2(offset.x);
    }

    /// Sidestep every nearby player bullet the dodge roll allows.
    fn dodge(
        &self,
        position: Vec2,
        threats: &[Projectile],
        tuning: &EnemyTuning,
        rng: &mut impl Rng,
    ) -> Vec2 {
        let mut offset = Vec2::ZERO;
        for bullet in threats {
            if bullet.position.distance(position) > tuning.dodge_distance {
                continue;
            }
            if !rng.random_bool(tuning.dodge_chance.clamp(0.0, 1.0)) {
                continue;
            }
            let perpendicular = bullet.velocity().perp().normalize_or_zero();
            let side = if (position - bullet.position).dot(perpendicular) < 0.0 {
                -1.0
            } else {
                1.0
            };
            offset += perpendicular * side * tuning.dodge_speed;
        }
        offset
    }

    fn fire(&mut self, position: Vec2, target: Vec2, tuning: &EnemyTuning) -> Option<Projectile> {
        self.fire_timer -= 1.0;
        if self.fire_timer > 0.0 {
            return None;
        }
        self.fire_timer = self.fire_rate;
        Some(muzzle_shot(
            position,
            target,
            tuning.gun_gap,
            tuning.bullet_speed,
            Vec2::from(tuning.bullet_size),
        ))
    }
}

pub(crate) fn run_enemy_ai(
    tuning: Res<EnemyTuning>,
    viewport: Res<Viewport>,
    mut rng: ResMut<CombatRng>,
    mut world: AvianWorld,
    players: Query<&Projectiles, (With<Player>, Without<Enemy>)>,
    mut enemies: Query<(Entity, &Health, &mut EnemyAi, &mut Projectiles), With<Enemy>>,
) {
    for (entity, health, mut ai, mut projectiles) in &mut enemies {
        let Some(state) = world.body_state(entity) else {
            continue;
        };
        let position = to_pixels(state.position);

        let target = ai
            .target
            .and_then(|player| world.body_state(player))
            .map(|body| to_pixels(body.position));
        let threats = ai
            .target
            .and_then(|player| players.get(player).ok())
            .map(|bullets| bullets.0.as_slice())
            .unwrap_or(&[]);

        let action = ai.think(
            position,
            health.fraction(),
            Surroundings {
                target,
                threats,
                bounds: viewport.bounds(),
            },
            &tuning,
            &mut rng.0,
        );

        if action.position != position {
            world.set_position(entity, to_physics(action.position));
        }
        if let Some(shot) = action.shot {
            projectiles.0.push(shot);
        }
    }
}
