//! Animator interface.
//!
//! Each call starts an animation and returns its duration in logical
//! milliseconds. The engine schedules exactly one completion at
//! `now + duration`; that completion is the only thing it relies on.

use crate::core::Cell;
use crate::creatures::Creature;

/// Motion playback for board transitions.
pub trait Animator {
    /// Play one path step; the creature's anchor is still `from`.
    fn play_step_move(&mut self, creature: &Creature, from: Cell, to: Cell) -> u64;

    /// Play an exit animation.
    fn play_elimination(&mut self, creature: &Creature) -> u64;

    /// Play a creature emerging from ice, or spawning.
    fn play_reveal(&mut self, creature: &Creature) -> u64;
}

/// Headless animator with fixed durations.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAnimator {
    /// Duration reported for every step.
    pub step_ms: u64,
}

impl NullAnimator {
    /// Create an animator whose steps take `step_ms`.
    #[must_use]
    pub fn new(step_ms: u64) -> Self {
        Self { step_ms }
    }
}

impl Animator for NullAnimator {
    fn play_step_move(&mut self, _creature: &Creature, _from: Cell, _to: Cell) -> u64 {
        self.step_ms
    }

    fn play_elimination(&mut self, _creature: &Creature) -> u64 {
        0
    }

    fn play_reveal(&mut self, _creature: &Creature) -> u64 {
        0
    }
}
