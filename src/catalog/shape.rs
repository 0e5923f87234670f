//! Shape and color definitions - static piece data.
//!
//! A `Shape` holds the immutable footprint of a piece type. For example a
//! "corner" occupies its anchor, the cell to its right and the cell below.
//! Instance data (anchor, lifecycle state) lives on `Creature`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Cell, ConfigError, Offset};

/// Unique identifier for a shape definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub u16);

impl ShapeId {
    /// Create a new shape ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ShapeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Shape({})", self.0)
    }
}

/// Color identifier: an index into the catalog's color list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColorId(pub u8);

impl ColorId {
    /// Create a new color ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Index into the catalog color list.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ColorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Color({})", self.0)
    }
}

/// A named color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorDef {
    /// Identifier.
    pub id: ColorId,
    /// Display name.
    pub name: String,
}

/// How a piece traverses cells.
///
/// Only the renderer and animator read this. The board engine carries it
/// through untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Walks on legs.
    Legged,
    /// Flies between cells.
    Winged,
    /// Crawls along the ground.
    Crawling,
}

/// Static shape definition.
///
/// ## Example
///
/// ```
/// use rust_critters::catalog::{Movement, Shape, ShapeId};
/// use rust_critters::core::Cell;
///
/// let pair = Shape::new(ShapeId::new(0), "pair", Movement::Crawling, [(0, 0), (1, 0)]);
/// let cells: Vec<_> = pair.cells_at(Cell::new(2, 2)).collect();
/// assert_eq!(cells, vec![Cell::new(2, 2), Cell::new(2, 3)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier.
    pub id: ShapeId,

    /// Shape name (for debugging/display).
    pub name: String,

    /// How pieces of this shape move (presentation only).
    pub movement: Movement,

    /// Cell offsets relative to the anchor, in declaration order.
    /// SmallVec keeps the common 1-4 cell shapes off the heap.
    pub offsets: SmallVec<[Offset; 4]>,
}

impl Shape {
    /// Create a shape from `(dx, dy)` pairs.
    pub fn new<I, O>(id: ShapeId, name: impl Into<String>, movement: Movement, offsets: I) -> Self
    where
        I: IntoIterator<Item = O>,
        O: Into<Offset>,
    {
        Self {
            id,
            name: name.into(),
            movement,
            offsets: offsets.into_iter().map(Into::into).collect(),
        }
    }

    /// Single-cell shape.
    pub fn single(id: ShapeId, name: impl Into<String>, movement: Movement) -> Self {
        Self::new(id, name, movement, [Offset::ORIGIN])
    }

    /// Number of cells this shape covers.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.offsets.len()
    }

    /// Cells covered when anchored at `anchor`, in offset order.
    pub fn cells_at(&self, anchor: Cell) -> impl Iterator<Item = Cell> + '_ {
        self.offsets.iter().map(move |&o| anchor + o)
    }

    /// Check that the shape includes its anchor and has no repeated offsets.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.offsets.contains(&Offset::ORIGIN) {
            return Err(ConfigError::ShapeMissingAnchor(self.name.clone()));
        }
        for (i, offset) in self.offsets.iter().enumerate() {
            if self.offsets[i + 1..].contains(offset) {
                return Err(ConfigError::DuplicateOffset(self.name.clone()));
            }
        }
        Ok(())
    }
}
