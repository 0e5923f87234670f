//! Logical-clock timer queue.
//!
//! Entries fire in `(due time, scheduling order)` order. Each entry gets a
//! `TimerToken` that can cancel it until it fires. The clock only moves when
//! the owner pops due entries or advances it explicitly, so playback is fully
//! deterministic.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Handle to a scheduled entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerToken(pub u64);

impl TimerToken {
    /// Get the raw token value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TimerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Timer({})", self.0)
    }
}

/// An entry popped from the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fired<T> {
    /// Token the entry was scheduled under.
    pub token: TimerToken,
    /// Logical time the entry was due.
    pub due: u64,
    /// Scheduled payload.
    pub payload: T,
}

/// Cancellable timer queue over a logical millisecond clock.
///
/// ## Usage
///
/// ```
/// use rust_critters::schedule::Scheduler;
///
/// let mut timers = Scheduler::new();
/// let melt = timers.schedule(900, "melt");
/// timers.schedule(120, "step");
///
/// assert!(timers.cancel(melt));
///
/// let fired = timers.pop_due(1000).unwrap();
/// assert_eq!(fired.payload, "step");
/// assert_eq!(timers.now(), 120);
/// assert!(timers.pop_due(1000).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    now: u64,
    next_token: u64,
    queue: BTreeMap<(u64, TimerToken), T>,
    due_by_token: FxHashMap<TimerToken, u64>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0,
            next_token: 0,
            queue: BTreeMap::new(),
            due_by_token: FxHashMap::default(),
        }
    }
}

impl<T> Scheduler<T> {
    /// Create an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedule `payload` to fire `delay` milliseconds from now.
    pub fn schedule(&mut self, delay: u64, payload: T) -> TimerToken {
        let token = TimerToken(self.next_token);
        self.next_token += 1;

        let due = self.now.saturating_add(delay);
        self.queue.insert((due, token), payload);
        self.due_by_token.insert(token, due);
        token
    }

    /// Cancel a pending entry.
    ///
    /// Returns `false` if the token already fired or was cancelled.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        match self.due_by_token.remove(&token) {
            Some(due) => self.queue.remove(&(due, token)).is_some(),
            None => false,
        }
    }

    /// Check whether a token is still pending.
    #[must_use]
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.due_by_token.contains_key(&token)
    }

    /// Due time of the earliest pending entry.
    #[must_use]
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|&(due, _)| due)
    }

    /// Pop the earliest entry due at or before `until`.
    ///
    /// Moves the clock forward to the entry's due time.
    pub fn pop_due(&mut self, until: u64) -> Option<Fired<T>> {
        let (&(due, token), _) = self.queue.iter().next()?;
        if due > until {
            return None;
        }

        let payload = self.queue.remove(&(due, token))?;
        self.due_by_token.remove(&token);
        self.now = self.now.max(due);
        Some(Fired { token, due, payload })
    }

    /// Move the clock forward without firing anything.
    ///
    /// Never moves it backwards.
    pub fn advance_clock(&mut self, to: u64) {
        self.now = self.now.max(to);
    }

    /// Number of pending entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drop every pending entry. The clock keeps its value.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.due_by_token.clear();
    }
}
