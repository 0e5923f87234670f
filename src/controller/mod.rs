//! Game orchestration.
//!
//! `GameSession` holds the board, creatures, ice, exits and progression.
//! `BoardController` owns a session and drives it from input and time,
//! recording a `BoardEvent` for each transition.

mod engine;
mod event;
mod session;

pub use engine::{BoardController, InvariantError};
pub use event::{BoardEvent, InputEvent};
pub use session::GameSession;
