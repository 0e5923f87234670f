//! Piece catalog: colors, shapes and exit slot assignment.
//!
//! ## Key Types
//!
//! - `Shape`: immutable cell-offset template plus movement tag
//! - `ColorId` / `ColorDef`: catalog colors
//! - `Movement`: closed set of traversal styles, read only by presentation
//! - `Catalog`: registry and random draws

pub mod shape;
pub mod registry;

pub use shape::{ColorDef, ColorId, Movement, Shape, ShapeId};
pub use registry::{Catalog, EXIT_SLOT_COUNT};
