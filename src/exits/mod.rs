//! Exit system.
//!
//! Exits are fixed for the life of a level: one per catalog color, bound to
//! a board-edge cell. A creature whose anchor finishes a move on the exit of
//! its own color is eliminated.

pub mod registry;

pub use registry::{exit_positions, Exit, ExitRegistry};
