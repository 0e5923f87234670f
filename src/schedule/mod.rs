//! Deferred callbacks.
//!
//! The board engine is single-threaded and cooperative. Anything that happens
//! "later" (an animation finishing, ice melting) is an entry in a `Scheduler`
//! keyed on a logical millisecond clock that the host drives forward.
//!
//! Tokens are cancellable until their entry fires, which is how a pending ice
//! reveal is withdrawn when its cell is claimed by another creature.

mod timer;

pub use timer::{Fired, Scheduler, TimerToken};
