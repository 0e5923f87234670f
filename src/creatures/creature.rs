//! Creature instances - runtime piece state.
//!
//! `Creature` is one placed instance of a catalog shape. It tracks the
//! anchor, color and lifecycle state. Occupied cells are never stored here:
//! they are always derived from the anchor and the shape offsets, and the
//! grid is the authority on who holds what.
//!
//! ## Lifecycle
//!
//! ```text
//! Hidden ──reveal──> Idle <──deselect── Selected
//!                     │ ▲                  ▲
//!                     │ └──finish move──┐  │
//!                     └─────select──────┼──┘
//!                                       │
//!              Selected ──move──> Walking ──exit match──> Eliminated
//! ```

use serde::{Deserialize, Serialize};

use crate::catalog::{ColorId, Movement, Shape, ShapeId};
use crate::core::{Cell, CreatureId};

/// Lifecycle state of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureState {
    /// Under ice: occupies its cells but is invisible and inert.
    Hidden,
    /// Visible and interactable.
    Idle,
    /// The one creature the player has picked.
    Selected,
    /// Executing a path. Not interactable.
    Walking,
    /// Left through its exit. Terminal.
    Eliminated,
}

impl CreatureState {
    /// Check whether `self -> next` is a legal lifecycle edge.
    #[must_use]
    pub const fn can_transition_to(self, next: CreatureState) -> bool {
        use CreatureState::*;
        matches!(
            (self, next),
            (Hidden, Idle)
                | (Idle, Selected)
                | (Selected, Idle)
                | (Selected, Walking)
                | (Walking, Idle)
                | (Walking, Eliminated)
        )
    }

    /// Check whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, CreatureState::Eliminated)
    }
}

impl std::fmt::Display for CreatureState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            CreatureState::Hidden => "hidden",
            CreatureState::Idle => "idle",
            CreatureState::Selected => "selected",
            CreatureState::Walking => "walking",
            CreatureState::Eliminated => "eliminated",
        };
        f.write_str(name)
    }
}

/// A creature on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Creature {
    /// Unique id.
    pub id: CreatureId,

    /// Reference cell; every occupied cell is anchor + a shape offset.
    pub anchor: Cell,

    /// Catalog shape.
    pub shape: ShapeId,

    /// Catalog color.
    pub color: ColorId,

    /// Traversal style, carried for the animator.
    pub movement: Movement,

    state: CreatureState,

    /// Set while a step animation is in flight.
    pub animating: bool,
}

impl Creature {
    /// Create a visible, idle creature.
    #[must_use]
    pub fn idle(id: CreatureId, anchor: Cell, shape: &Shape, color: ColorId) -> Self {
        Self {
            id,
            anchor,
            shape: shape.id,
            color,
            movement: shape.movement,
            state: CreatureState::Idle,
            animating: false,
        }
    }

    /// Create a creature hidden under ice.
    #[must_use]
    pub fn hidden(id: CreatureId, anchor: Cell, shape: &Shape, color: ColorId) -> Self {
        Self {
            state: CreatureState::Hidden,
            ..Self::idle(id, anchor, shape, color)
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> CreatureState {
        self.state
    }

    /// Move to `next` if the lifecycle allows it.
    ///
    /// Returns `false` and leaves the state untouched otherwise.
    pub fn transition(&mut self, next: CreatureState) -> bool {
        if !self.state.can_transition_to(next) {
            return false;
        }
        self.state = next;
        true
    }

    /// Check whether the player can pick this creature.
    #[must_use]
    pub fn is_interactable(&self) -> bool {
        matches!(self.state, CreatureState::Idle | CreatureState::Selected)
    }

    /// Check whether the renderer should draw this creature.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self.state, CreatureState::Hidden | CreatureState::Eliminated)
    }

    /// Cells this creature covers, derived from the anchor.
    pub fn cells<'a>(&self, shape: &'a Shape) -> impl Iterator<Item = Cell> + 'a {
        shape.cells_at(self.anchor)
    }
}
