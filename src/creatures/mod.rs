//! Creatures and ice covers.
//!
//! ## Key Types
//!
//! - `Creature`: placed piece instance with its lifecycle state
//! - `CreatureState`: hidden → idle → selected → walking → eliminated
//! - `IceCover`: veil over a hidden creature or an empty cell

pub mod creature;
pub mod ice;

pub use creature::{Creature, CreatureState};
pub use ice::{IceCover, IcePhase};
