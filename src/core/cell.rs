//! Board coordinates.
//!
//! `Cell` addresses a board square by `(row, col)`. Coordinates are signed so
//! anchor + offset arithmetic can land off the board and be rejected by the
//! grid's bounds check rather than wrapping.
//!
//! `Offset` is a shape-relative displacement. Following the shape catalog
//! convention, `dx` moves along columns and `dy` along rows.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A board cell, addressed by row then column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row index (0 = top edge).
    pub row: i32,
    /// Column index (0 = left edge).
    pub col: i32,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Apply a shape offset to this cell.
    #[must_use]
    pub const fn offset(self, offset: Offset) -> Self {
        Self {
            row: self.row + offset.dy,
            col: self.col + offset.dx,
        }
    }

    /// Manhattan distance to another cell.
    #[must_use]
    pub const fn manhattan(self, other: Cell) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// The four orthogonal neighbours, in up, down, left, right order.
    ///
    /// Neighbours may be off the board; callers bounds-check.
    #[must_use]
    pub const fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.row - 1, self.col),
            Cell::new(self.row + 1, self.col),
            Cell::new(self.row, self.col - 1),
            Cell::new(self.row, self.col + 1),
        ]
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl Add<Offset> for Cell {
    type Output = Cell;

    fn add(self, rhs: Offset) -> Cell {
        self.offset(rhs)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Shape-relative displacement from a creature's anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// The anchor itself.
    pub const ORIGIN: Offset = Offset { dx: 0, dy: 0 };

    /// Create a new offset.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl From<(i32, i32)> for Offset {
    fn from((dx, dy): (i32, i32)) -> Self {
        Self { dx, dy }
    }
}
