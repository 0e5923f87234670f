//! Ice covers.
//!
//! An `IceCover` veils either a hidden creature (its footprint is the
//! creature's cells) or a single empty cell. While a reveal is pending the
//! cover holds the scheduler token for it, so the reveal can be withdrawn.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Cell, CreatureId, IceId};
use crate::schedule::TimerToken;

/// Where a cover is in its reveal schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IcePhase {
    /// Untouched, or waiting out the grace delay.
    Frozen,
    /// Melt animation running; reveal resolves when it finishes.
    Melting,
}

/// Ice over a hidden creature or an empty cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCover {
    /// Unique id.
    pub id: IceId,

    /// Reference cell (the creature's anchor, or the empty cell).
    pub anchor: Cell,

    /// Cells the cover spans.
    pub footprint: SmallVec<[Cell; 4]>,

    /// Creature underneath, if any.
    pub creature: Option<CreatureId>,

    /// Reveal phase.
    pub phase: IcePhase,

    /// Pending reveal timer.
    pub token: Option<TimerToken>,
}

impl IceCover {
    /// Cover a hidden creature.
    pub fn over_creature(id: IceId, creature: CreatureId, anchor: Cell, cells: impl IntoIterator<Item = Cell>) -> Self {
        Self {
            id,
            anchor,
            footprint: cells.into_iter().collect(),
            creature: Some(creature),
            phase: IcePhase::Frozen,
            token: None,
        }
    }

    /// Cover an empty cell.
    #[must_use]
    pub fn empty(id: IceId, cell: Cell) -> Self {
        Self {
            id,
            anchor: cell,
            footprint: std::iter::once(cell).collect(),
            creature: None,
            phase: IcePhase::Frozen,
            token: None,
        }
    }

    /// Check whether the cover spans `cell`.
    #[must_use]
    pub fn covers(&self, cell: Cell) -> bool {
        self.footprint.contains(&cell)
    }

    /// Manhattan distance from `cell` to the nearest footprint cell.
    #[must_use]
    pub fn distance_to(&self, cell: Cell) -> u32 {
        self.footprint
            .iter()
            .map(|c| c.manhattan(cell))
            .min()
            .unwrap_or(u32::MAX)
    }

    /// Check whether a reveal is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.token.is_some()
    }

    /// Record a scheduled reveal stage.
    pub fn arm(&mut self, token: TimerToken, phase: IcePhase) {
        self.token = Some(token);
        self.phase = phase;
    }

    /// Forget the pending reveal and refreeze.
    ///
    /// Returns the token so the caller can cancel it.
    pub fn disarm(&mut self) -> Option<TimerToken> {
        self.phase = IcePhase::Frozen;
        self.token.take()
    }
}
