//! Combat domain: AI modules.

pub mod enemy;

pub use enemy::{EnemyAction, EnemyAi, FlightPattern, Surroundings, fire_rate, pattern_interval};
