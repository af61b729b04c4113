//! Content domain: the gameplay tuning document.

use serde::Deserialize;

use crate::combat::{CombatTuning, EnemyTuning};
use crate::level::LevelTuning;
use crate::movement::MovementTuning;

/// Everything in `assets/data/tuning.ron`. Sections left out of the file
/// keep their built-in values, field by field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameplayTuning {
    pub movement: MovementTuning,
    pub combat: CombatTuning,
    pub enemy: EnemyTuning,
    pub levels: LevelTuning,
}
