//! Core engine types: ids, coordinates, RNG, configuration.
//!
//! These are the leaf building blocks every other module depends on.

pub mod entity;
pub mod cell;
pub mod rng;
pub mod config;

pub use entity::{CreatureId, IceId, VisualId};
pub use cell::{Cell, Offset};
pub use rng::{GameRng, GameRngState};
pub use config::{BlockedStep, ConfigError, GameConfig, LevelTargetFormula, RevealScope, MIN_BOARD_SIZE};
