//! Movement domain: the player locomotion controller.
//!
//! Each tick runs in two halves around the physics step. `pre_step` turns
//! intent into impulses and velocity overrides, `post_step` reads the
//! integrated body back and derives the locomotion state from it. Control
//! events only record intent, except dash, which latches immediately.

use bevy::prelude::*;

use super::components::{Control, ControlEvent, Facing, LocomotionState, MovementCue};
use super::resources::MovementTuning;
use super::sensor::{ActorBody, GroundSensor, Surface};
use crate::physics::{RigidBodyWorld, length_to_physics, to_physics, to_pixels};

/// Share of velocity kept when a dash ends.
const DASH_MOMENTUM_KEEP: f32 = 0.5;

#[derive(Component, Debug, Clone)]
pub struct MovementController {
    pub state: LocomotionState,
    pub previous_state: LocomotionState,
    pub facing: Facing,
    /// -1, 0 or 1.
    pub direction: i8,
    left_held: bool,
    right_held: bool,
    /// Running is the default; the walk modifier clears it while grounded.
    pub running: bool,
    jump_requested: bool,
    /// Cleared by a jump, re-armed by a real ground contact.
    jump_armed: bool,
    jump_key_held: bool,
    pub dash_timer: u32,
    pub dash_cooldown_timer: u32,
    has_dashed: bool,
    dash_direction: f32,
    pub ground_forgiveness_timer: u32,
    stuck_counter: u32,
    unstick_pending: bool,
    last_position: Option<Vec2>,
    /// Speed selected on the ground, kept through the air (pixels/s).
    current_speed: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            state: LocomotionState::Idle,
            previous_state: LocomotionState::Idle,
            facing: Facing::Right,
            direction: 0,
            left_held: false,
            right_held: false,
            running: true,
            jump_requested: false,
            jump_armed: true,
            jump_key_held: false,
            dash_timer: 0,
            dash_cooldown_timer: 0,
            has_dashed: false,
            dash_direction: 1.0,
            ground_forgiveness_timer: 0,
            stuck_counter: 0,
            unstick_pending: false,
            last_position: None,
            current_speed: 0.0,
        }
    }
}

impl MovementController {
    pub fn is_dashing(&self) -> bool {
        self.state == LocomotionState::Dashing
    }

    fn can_dash(&self) -> bool {
        !self.is_dashing() && (self.dash_cooldown_timer == 0 || !self.has_dashed)
    }

    fn selected_speed(&self, tuning: &MovementTuning) -> f32 {
        if self.running {
            tuning.run_speed
        } else {
            tuning.walk_speed
        }
    }

    fn refresh_direction(&mut self, preferred: i8) {
        self.direction = match (self.left_held, self.right_held) {
            (true, true) => preferred,
            (true, false) => -1,
            (false, true) => 1,
            (false, false) => 0,
        };
        match self.direction {
            d if d < 0 => self.facing = Facing::Left,
            d if d > 0 => self.facing = Facing::Right,
            _ => {}
        }
    }

    /// Record a key transition. Dash starts here so the very next step
    /// already runs at dash velocity.
    pub fn apply_control(
        &mut self,
        event: ControlEvent,
        world: &impl RigidBodyWorld,
        body: &ActorBody,
        sensor: &GroundSensor,
        tuning: &MovementTuning,
    ) -> Option<MovementCue> {
        match (event.control, event.pressed) {
            (Control::Left, true) => {
                self.left_held = true;
                self.refresh_direction(-1);
            }
            (Control::Right, true) => {
                self.right_held = true;
                self.refresh_direction(1);
            }
            (Control::Left, false) => {
                self.left_held = false;
                self.refresh_direction(self.direction);
            }
            (Control::Right, false) => {
                self.right_held = false;
                self.refresh_direction(self.direction);
            }
            (Control::WalkModifier, pressed) => {
                if sensor.is_grounded(world, body, self.ground_forgiveness_timer) {
                    self.running = !pressed;
                }
            }
            (Control::Jump, true) => {
                if !self.jump_key_held {
                    self.jump_key_held = true;
                    self.jump_requested = true;
                }
            }
            (Control::Jump, false) => {
                self.jump_key_held = false;
            }
            (Control::Dash, true) => {
                if self.can_dash() {
                    self.has_dashed = true;
                    self.dash_timer = tuning.dash_duration;
                    self.dash_direction = if self.direction != 0 {
                        f32::from(self.direction)
                    } else {
                        self.facing.sign()
                    };
                    self.previous_state = self.state;
                    self.state = LocomotionState::Dashing;
                    self.jump_requested = false;
                    debug!("Dash started: direction={}", self.dash_direction);
                    return Some(MovementCue::DashStarted);
                }
            }
            (Control::Dash, false) => {}
        }
        None
    }

    /// Apply this tick's forces. Must run before the physics step.
    pub fn pre_step(
        &mut self,
        world: &mut impl RigidBodyWorld,
        body: &ActorBody,
        sensor: &GroundSensor,
        tuning: &MovementTuning,
    ) -> Option<MovementCue> {
        let handle = body.handle;
        let Some(state) = world.body_state(handle) else {
            return None;
        };

        if self.is_dashing() {
            self.jump_requested = false;
            return self.step_dash(world, body, tuning);
        }

        let hit = sensor.ground_hit(&*world, body);
        let grounded = hit.is_some() || self.ground_forgiveness_timer > 0;
        if hit.is_some() {
            self.current_speed = self.selected_speed(tuning);
        }
        let surface = hit.map(|h| h.surface);
        let mass = state.mass;

        if self.unstick_pending {
            self.unstick_pending = false;
            if self.direction != 0 {
                let dir = f32::from(self.direction);
                world.apply_linear_impulse(
                    handle,
                    Vec2::new(0.0, mass * length_to_physics(tuning.unstick_lift)),
                );
                let velocity = current_velocity(&*world, body);
                world.set_linear_velocity(
                    handle,
                    Vec2::new(dir * length_to_physics(self.current_speed), velocity.y),
                );
                debug!("Unstick correction applied: direction={}", dir);
            }
        }

        self.apply_horizontal(world, body, sensor, tuning, surface, mass);

        let mut cue = None;
        if self.jump_requested {
            self.jump_requested = false;
            if self.jump_armed && grounded {
                let velocity = current_velocity(&*world, body);
                if velocity.y < 0.0 {
                    world.set_linear_velocity(handle, Vec2::new(velocity.x, 0.0));
                }
                world.apply_linear_impulse(
                    handle,
                    Vec2::new(0.0, mass * length_to_physics(tuning.jump_velocity)),
                );
                self.jump_armed = false;
                self.ground_forgiveness_timer = 0;
                self.set_state(LocomotionState::Jumping);
                debug!("Jump: on_ground={}", hit.is_some());
                cue = Some(MovementCue::Jumped);
            }
        }

        let velocity = current_velocity(&*world, body);
        if velocity.y > 0.0 && sensor.is_ceiling_above(&*world, body) {
            world.set_linear_velocity(
                handle,
                Vec2::new(velocity.x, -velocity.y * tuning.ceiling_bounce),
            );
            self.set_state(LocomotionState::Falling);
            debug!("Ceiling bounce");
        }

        cue
    }

    fn step_dash(
        &mut self,
        world: &mut impl RigidBodyWorld,
        body: &ActorBody,
        tuning: &MovementTuning,
    ) -> Option<MovementCue> {
        let handle = body.handle;
        if self.dash_timer > 0 {
            let speed = length_to_physics(tuning.dash_velocity);
            world.set_linear_velocity(handle, Vec2::new(self.dash_direction * speed, 0.0));
            world.set_gravity_scale(handle, 0.0);
            self.dash_timer -= 1;
        }
        if self.dash_timer > 0 {
            return None;
        }

        world.set_gravity_scale(handle, 1.0);
        let velocity = current_velocity(&*world, body);
        world.set_linear_velocity(handle, velocity * DASH_MOMENTUM_KEEP);
        self.dash_cooldown_timer = tuning.dash_cooldown;
        self.state = self.previous_state;
        debug!("Dash ended: cooldown={}", self.dash_cooldown_timer);
        Some(MovementCue::DashEnded)
    }

    fn apply_horizontal(
        &mut self,
        world: &mut impl RigidBodyWorld,
        body: &ActorBody,
        sensor: &GroundSensor,
        tuning: &MovementTuning,
        surface: Option<Surface>,
        mass: f32,
    ) {
        let handle = body.handle;
        let velocity = current_velocity(&*world, body);

        if self.direction == 0 {
            match surface {
                Some(surface) => {
                    let damping = match surface {
                        Surface::Ice => tuning.ice_damping,
                        Surface::Ground => tuning.ground_damping,
                    };
                    world.set_linear_velocity(handle, Vec2::new(velocity.x * damping, velocity.y));
                }
                None => {
                    let impulse = mass * -velocity.x * tuning.air_blend;
                    world.apply_linear_impulse(handle, Vec2::new(impulse, 0.0));
                }
            }
            return;
        }

        let dir = f32::from(self.direction);

        if surface.is_none() && sensor.is_wall_ahead(&*world, body, dir) {
            // Pushing into a wall in the air: shove away and down instead.
            let push = Vec2::new(
                -dir * length_to_physics(tuning.wall_push),
                -length_to_physics(tuning.wall_push_down),
            );
            world.apply_linear_impulse(handle, push * mass);
            return;
        }

        let mut vx = velocity.x;
        if vx.abs() < length_to_physics(tuning.min_speed_threshold) {
            vx = dir * length_to_physics(tuning.min_speed_boost);
            world.set_linear_velocity(handle, Vec2::new(vx, velocity.y));
        }

        let blend = match surface {
            Some(Surface::Ground) => tuning.ground_blend,
            Some(Surface::Ice) => tuning.ice_blend,
            None => tuning.air_blend,
        };
        let target = dir * length_to_physics(self.current_speed);
        world.apply_linear_impulse(handle, Vec2::new(mass * (target - vx) * blend, 0.0));
    }

    /// Read the integrated body back. Must run after the physics step.
    ///
    /// `viewport` is the render-space size in pixels used for screen wrap.
    pub fn post_step(
        &mut self,
        world: &mut impl RigidBodyWorld,
        body: &ActorBody,
        sensor: &GroundSensor,
        tuning: &MovementTuning,
        viewport: Vec2,
    ) -> Option<MovementCue> {
        let handle = body.handle;
        let Some(state) = world.body_state(handle) else {
            return None;
        };

        let on_ground = sensor.ground_hit(&*world, body).is_some();
        if on_ground {
            self.ground_forgiveness_timer = tuning.ground_forgiveness;
            if state.velocity.y <= 0.0 {
                self.jump_armed = true;
            }
        } else {
            self.ground_forgiveness_timer = self.ground_forgiveness_timer.saturating_sub(1);
        }
        self.dash_cooldown_timer = self.dash_cooldown_timer.saturating_sub(1);

        let mut cue = None;
        if on_ground && self.state.is_airborne() {
            cue = Some(MovementCue::Landed);
            if self.direction != 0 {
                // Drop whatever horizontal speed piled up in the air.
                let target = f32::from(self.direction)
                    * length_to_physics(self.selected_speed(tuning));
                world.set_linear_velocity(handle, Vec2::new(target, state.velocity.y));
            }
            debug!("Landed: direction={}", self.direction);
        }

        self.track_stuck(world, body, sensor, tuning, on_ground, state.position);

        let position = wrap_position(world, body, state.position, viewport, tuning.wrap_margin);
        self.last_position = Some(position);

        if !self.is_dashing() {
            let velocity = current_velocity(&*world, body);
            let derived = self.derive_state(on_ground, velocity, tuning);
            self.set_state(derived);
        }

        cue
    }

    fn track_stuck(
        &mut self,
        world: &impl RigidBodyWorld,
        body: &ActorBody,
        sensor: &GroundSensor,
        tuning: &MovementTuning,
        on_ground: bool,
        position: Vec2,
    ) {
        let pushing = on_ground && self.direction != 0 && !self.is_dashing();
        let barely_moved = self.last_position.is_some_and(|last| {
            (position.x - last.x).abs() < length_to_physics(tuning.stuck_epsilon)
        });
        let dir = f32::from(self.direction);

        if pushing && barely_moved && !sensor.is_wall_ahead(world, body, dir) {
            self.stuck_counter += 1;
            if self.stuck_counter >= tuning.stuck_ticks {
                self.unstick_pending = true;
                self.stuck_counter = 0;
            }
        } else {
            self.stuck_counter = 0;
        }
    }

    fn derive_state(
        &self,
        on_ground: bool,
        velocity: Vec2,
        tuning: &MovementTuning,
    ) -> LocomotionState {
        if !on_ground {
            if velocity.y > 0.0 {
                LocomotionState::Jumping
            } else {
                LocomotionState::Falling
            }
        } else if velocity.x.abs() > length_to_physics(tuning.moving_threshold) {
            if self.running && self.direction != 0 {
                LocomotionState::Sprint
            } else {
                LocomotionState::Walking
            }
        } else {
            LocomotionState::Idle
        }
    }

    fn set_state(&mut self, state: LocomotionState) {
        if self.state != state {
            self.previous_state = self.state;
            self.state = state;
        }
    }
}

fn current_velocity(world: &impl RigidBodyWorld, body: &ActorBody) -> Vec2 {
    world
        .body_state(body.handle)
        .map_or(Vec2::ZERO, |state| state.velocity)
}

/// Teleport the body to the opposite edge once it leaves the viewport by more
/// than `margin` pixels on either axis. Velocity is preserved.
fn wrap_position(
    world: &mut impl RigidBodyWorld,
    body: &ActorBody,
    position: Vec2,
    viewport: Vec2,
    margin: f32,
) -> Vec2 {
    let mut pixels = to_pixels(position);
    let mut wrapped = false;

    for axis in 0..2 {
        if pixels[axis] < -margin {
            pixels[axis] = viewport[axis] + margin / 2.0;
            wrapped = true;
        } else if pixels[axis] > viewport[axis] + margin {
            pixels[axis] = -margin / 2.0;
            wrapped = true;
        }
    }

    if !wrapped {
        return position;
    }
    let target = to_physics(pixels);
    world.set_position(body.handle, target);
    debug!("Screen wrap to {:?}", pixels);
    target
}
