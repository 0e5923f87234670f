//! Presentation seams.
//!
//! Rendering and animation live outside the engine. The controller drives
//! them through `Renderer` and `Animator` and never lets them touch the grid.
//! `NullRenderer`/`NullAnimator` run the engine headless;
//! `RecordingRenderer` records calls for inspection.

mod animator;
mod renderer;

pub use animator::{Animator, NullAnimator};
pub use renderer::{NullRenderer, RecordingRenderer, RenderCall, RenderError, Renderer};
