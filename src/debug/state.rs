//! Debug domain: toggles for debug tooling.

use bevy::prelude::*;

/// Resource tracking debug mode state
#[derive(Resource, Debug, Default)]
pub struct DebugState {
    /// Whether hitboxes and sensor probes are drawn
    pub show_gizmos: bool,
}
