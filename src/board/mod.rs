//! Board geometry: the occupancy grid and the path planner.
//!
//! ## Key Types
//!
//! - `Grid`: authoritative cell -> creature mapping
//! - `compute_path`: row-then-column step sequence between two cells

pub mod grid;
pub mod path;

pub use grid::Grid;
pub use path::{compute_path, path_length};
