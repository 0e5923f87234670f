//! Board events.
//!
//! Every observable transition the controller makes is recorded as a
//! `BoardEvent`. Hosts drain them to drive presentation that lives outside
//! the engine: score text, level banners, sounds.

use serde::{Deserialize, Serialize};

use crate::catalog::ColorId;
use crate::core::{Cell, CreatureId, IceId};

/// Something that happened on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// A fresh board was laid out.
    BoardInitialized {
        level: u32,
        visible: usize,
        hidden: usize,
        empty_ice: usize,
        target: u32,
    },

    /// A creature became the selection.
    Selected(CreatureId),

    /// The selection was dropped without moving.
    Deselected(CreatureId),

    /// A walk began.
    MoveStarted {
        creature: CreatureId,
        from: Cell,
        to: Cell,
        steps: usize,
    },

    /// One path step committed to the grid.
    Stepped {
        creature: CreatureId,
        from: Cell,
        to: Cell,
    },

    /// A step could not commit; the walk ended early.
    MoveHalted {
        creature: CreatureId,
        at: Cell,
        blocked: Cell,
    },

    /// A walk crossed a cell held by another creature without stopping.
    PassedOver { creature: CreatureId, cell: Cell },

    /// A walk ended without an exit match.
    MoveFinished { creature: CreatureId, at: Cell },

    /// A creature left through its exit.
    Eliminated {
        creature: CreatureId,
        color: ColorId,
        at: Cell,
        score: u32,
    },

    /// Ice started melting.
    IceMelting { ice: IceId },

    /// A hidden creature was uncovered.
    Revealed { creature: CreatureId, ice: IceId },

    /// A new creature emerged from empty ice.
    Spawned { creature: CreatureId, ice: IceId },

    /// Melted ice had nothing to release and its cell was taken.
    RevealFizzled { ice: IceId },

    /// A pending reveal was withdrawn because its cell was claimed.
    RevealCancelled { ice: IceId },

    /// The level target was met and a new level began.
    LevelAdvanced { level: u32, target: u32 },
}

/// Player input, as a host would queue it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// A creature's visual was activated.
    CreatureActivated(CreatureId),

    /// A board position was activated; may lie off the board.
    CellActivated { row: i32, col: i32 },
}

impl BoardEvent {
    /// Creature the event is about, if any.
    #[must_use]
    pub fn creature(&self) -> Option<CreatureId> {
        match self {
            BoardEvent::Selected(id) | BoardEvent::Deselected(id) => Some(*id),
            BoardEvent::MoveStarted { creature, .. }
            | BoardEvent::Stepped { creature, .. }
            | BoardEvent::MoveHalted { creature, .. }
            | BoardEvent::PassedOver { creature, .. }
            | BoardEvent::MoveFinished { creature, .. }
            | BoardEvent::Eliminated { creature, .. }
            | BoardEvent::Revealed { creature, .. }
            | BoardEvent::Spawned { creature, .. } => Some(*creature),
            BoardEvent::BoardInitialized { .. }
            | BoardEvent::IceMelting { .. }
            | BoardEvent::RevealFizzled { .. }
            | BoardEvent::RevealCancelled { .. }
            | BoardEvent::LevelAdvanced { .. } => None,
        }
    }
}
