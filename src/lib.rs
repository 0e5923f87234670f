//! # rust-critters
//!
//! Board and creature state engine for a grid puzzle: colored creatures of
//! assorted shapes are walked to matching exits on the board edge.
//!
//! ## Design Principles
//!
//! 1. **Engine, not UI**: Rendering and animation are traits. The engine
//!    never reads visual state back; presentation failures are logged and
//!    play continues.
//!
//! 2. **Logical Time**: Animation completions and ice reveals are entries
//!    on a millisecond scheduler. Hosts advance the clock; tests settle it.
//!
//! 3. **Deterministic**: Layout and spawns draw from seeded ChaCha streams,
//!    so a seed reproduces a board exactly.
//!
//! ## Modules
//!
//! - `core`: Ids, cells, RNG, configuration
//! - `catalog`: Shapes and colors
//! - `board`: Occupancy grid and path planning
//! - `exits`: Color-to-edge exit bindings
//! - `creatures`: Creature lifecycle and ice covers
//! - `schedule`: Logical-clock task scheduler
//! - `present`: Renderer and animator seams
//! - `controller`: Session state and the board controller

pub mod board;
pub mod catalog;
pub mod controller;
pub mod core;
pub mod creatures;
pub mod exits;
pub mod present;
pub mod schedule;

// Re-export commonly used types
pub use crate::core::{
    BlockedStep, Cell, ConfigError, CreatureId, GameConfig, GameRng, GameRngState, IceId, LevelTargetFormula,
    Offset, RevealScope, VisualId,
};

pub use crate::catalog::{Catalog, ColorDef, ColorId, Movement, Shape, ShapeId};

pub use crate::board::{compute_path, Grid};

pub use crate::exits::{Exit, ExitRegistry};

pub use crate::creatures::{Creature, CreatureState, IceCover, IcePhase};

pub use crate::schedule::{Scheduler, TimerToken};

pub use crate::present::{Animator, NullAnimator, NullRenderer, RecordingRenderer, RenderError, Renderer};

pub use crate::controller::{BoardController, BoardEvent, GameSession, InputEvent, InvariantError};
