//! Renderer interface.
//!
//! The renderer turns board state into visible output. The engine never
//! reads anything back except failures, and those are only logged: a missing
//! visual must not stall the game.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::core::VisualId;
use crate::creatures::{Creature, IceCover};

/// Renderer failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The renderer has no element for this id.
    #[error("no visual for {0}")]
    MissingVisual(VisualId),

    /// Backend-specific failure.
    #[error("render backend error: {0}")]
    Backend(String),
}

/// Visual presentation of board objects.
pub trait Renderer {
    /// Draw or refresh a creature.
    fn present(&mut self, creature: &Creature) -> Result<(), RenderError>;

    /// Draw or refresh an ice cover.
    fn present_ice(&mut self, cover: &IceCover) -> Result<(), RenderError>;

    /// Remove the element for `id`.
    fn remove_visual(&mut self, id: VisualId) -> Result<(), RenderError>;
}

/// Renderer that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _creature: &Creature) -> Result<(), RenderError> {
        Ok(())
    }

    fn present_ice(&mut self, _cover: &IceCover) -> Result<(), RenderError> {
        Ok(())
    }

    fn remove_visual(&mut self, _id: VisualId) -> Result<(), RenderError> {
        Ok(())
    }
}

/// One call received by a `RecordingRenderer`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderCall {
    /// `present` for a creature.
    Present(VisualId),
    /// `present_ice` for a cover.
    PresentIce(VisualId),
    /// `remove_visual`.
    Remove(VisualId),
}

/// Headless renderer that tracks live visuals and records every call.
///
/// Removing a visual it never presented reports `MissingVisual`, which makes
/// it useful for checking that presentation failures do not block the game.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    /// Calls in arrival order.
    pub calls: Vec<RenderCall>,
    live: FxHashSet<VisualId>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a visual is currently shown.
    #[must_use]
    pub fn is_live(&self, id: VisualId) -> bool {
        self.live.contains(&id)
    }

    /// Number of visuals currently shown.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl Renderer for RecordingRenderer {
    fn present(&mut self, creature: &Creature) -> Result<(), RenderError> {
        let id = VisualId::Creature(creature.id);
        self.calls.push(RenderCall::Present(id));
        self.live.insert(id);
        Ok(())
    }

    fn present_ice(&mut self, cover: &IceCover) -> Result<(), RenderError> {
        let id = VisualId::Ice(cover.id);
        self.calls.push(RenderCall::PresentIce(id));
        self.live.insert(id);
        Ok(())
    }

    fn remove_visual(&mut self, id: VisualId) -> Result<(), RenderError> {
        self.calls.push(RenderCall::Remove(id));
        if self.live.remove(&id) {
            Ok(())
        } else {
            Err(RenderError::MissingVisual(id))
        }
    }
}
