//! Physics domain: bodies queued for removal once the step has finished.

use bevy::prelude::*;

use super::avian::AvianWorld;
use super::world::{BodyHandle, RigidBodyWorld};

/// Pending body removals. Gameplay code schedules, only the drain destroys.
#[derive(Resource, Debug, Default)]
pub struct DestructionQueue {
    pending: Vec<BodyHandle>,
}

impl DestructionQueue {
    /// Schedule a body for removal. Scheduling twice is a no-op.
    pub fn schedule(&mut self, body: BodyHandle) {
        if !self.pending.contains(&body) {
            self.pending.push(body);
        }
    }

    pub fn is_scheduled(&self, body: BodyHandle) -> bool {
        self.pending.contains(&body)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget pending removals when the bodies are torn down some other way.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Destroy every scheduled body. Returns how many were drained.
    pub fn drain_into(&mut self, world: &mut impl RigidBodyWorld) -> usize {
        let count = self.pending.len();
        for body in self.pending.drain(..) {
            world.destroy_body(body);
        }
        count
    }
}

/// Runs at the top of the tick, after the previous physics step completed.
pub(crate) fn drain_destruction_queue(
    mut queue: ResMut<DestructionQueue>,
    mut world: AvianWorld,
) {
    if queue.is_empty() {
        return;
    }
    let drained = queue.drain_into(&mut world);
    debug!("Destroyed {} queued bodies", drained);
}
