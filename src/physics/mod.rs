//! Physics domain: world contract, avian2d backend and fixed-step ordering.

mod avian;
mod destruction;
mod units;
mod world;

#[cfg(test)]
pub(crate) mod testing;
#[cfg(test)]
mod tests;

use avian2d::prelude::*;
use bevy::prelude::*;

pub use avian::{AvianWorld, GameLayer};
pub use destruction::DestructionQueue;
pub use units::{PPM, length_to_physics, to_physics, to_pixels};
pub use world::{
    BodyDesc, BodyHandle, BodyKind, BodyState, BodyTag, RayControl, RayHit, RigidBodyWorld,
    SteppedWorld,
};

/// Simulation rate. Every per-tick timer in the game counts these ticks.
pub const TICK_HZ: f64 = 60.0;

/// Milliseconds of simulated time per tick.
pub const TICK_MS: f32 = 1000.0 / TICK_HZ as f32;

/// Solver substeps per tick.
const SUBSTEPS: u32 = 8;

/// Ordering of gameplay work inside `FixedUpdate`.
///
/// avian2d steps in `FixedPostUpdate`, so `Cleanup` at the top of a tick
/// observes the step that closed the previous tick, and `BeforeStep` at the
/// bottom writes the forces the next step integrates.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Deferred destruction drain.
    Cleanup,
    /// Body read-back and locomotion state derivation.
    ReadBack,
    /// Animation, combat, enemy AI and level rules.
    Gameplay,
    /// Input intents applied to controllers.
    Control,
    /// Impulses and velocity overrides for the coming step.
    BeforeStep,
}

/// Downward acceleration in physics units for a gravity given in pixels/s².
pub fn gravity_from_pixels(pixels_per_second_sq: f32) -> Gravity {
    Gravity(Vec2::new(0.0, -length_to_physics(pixels_per_second_sq)))
}

pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(PhysicsPlugins::default())
            .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .insert_resource(SubstepCount(SUBSTEPS))
            .init_resource::<DestructionQueue>()
            .configure_sets(
                FixedUpdate,
                (
                    TickSet::Cleanup,
                    TickSet::ReadBack,
                    TickSet::Gameplay,
                    TickSet::Control,
                    TickSet::BeforeStep,
                )
                    .chain(),
            )
            .add_systems(
                FixedUpdate,
                destruction::drain_destruction_queue.in_set(TickSet::Cleanup),
            );
    }
}
