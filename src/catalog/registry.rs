//! Piece catalog for shape and color lookup.
//!
//! The `Catalog` stores every color and shape a session can place. Ids are
//! assigned in registration order, so random draws from a seeded RNG are
//! reproducible.

use crate::core::{ConfigError, GameRng, Offset};

use super::shape::{ColorDef, ColorId, Movement, Shape, ShapeId};

/// Number of fixed exit slots on the board edge.
///
/// Colors registered beyond this count receive no exit.
pub const EXIT_SLOT_COUNT: usize = 6;

/// Registry of colors and shapes.
///
/// ## Example
///
/// ```
/// use rust_critters::catalog::{Catalog, Movement};
///
/// let mut catalog = Catalog::new();
/// let red = catalog.register_color("red");
/// let dot = catalog.register_shape("dot", Movement::Crawling, [(0, 0)]);
///
/// assert_eq!(catalog.color(red).unwrap().name, "red");
/// assert_eq!(catalog.shape(dot).unwrap().cell_count(), 1);
/// assert_eq!(catalog.exit_slot(red), Some(0));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    colors: Vec<ColorDef>,
    shapes: Vec<Shape>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock catalog: six colors, one per exit slot, and six shapes.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for name in ["red", "blue", "green", "yellow", "purple", "orange"] {
            catalog.register_color(name);
        }

        catalog.register_shape("dot", Movement::Crawling, [(0, 0)]);
        catalog.register_shape("pair", Movement::Crawling, [(0, 0), (1, 0)]);
        catalog.register_shape("column", Movement::Legged, [(0, 0), (0, 1)]);
        catalog.register_shape("corner", Movement::Legged, [(0, 0), (1, 0), (0, 1)]);
        catalog.register_shape("tee", Movement::Winged, [(0, 0), (-1, 0), (1, 0), (0, 1)]);
        catalog.register_shape("block", Movement::Winged, [(0, 0), (1, 0), (0, 1), (1, 1)]);
        catalog
    }

    /// Register a color and return its id.
    ///
    /// Panics past 255 colors.
    pub fn register_color(&mut self, name: impl Into<String>) -> ColorId {
        let index = u8::try_from(self.colors.len())
            .unwrap_or_else(|_| panic!("Catalog supports at most 256 colors"));
        let id = ColorId::new(index);
        self.colors.push(ColorDef {
            id,
            name: name.into(),
        });
        id
    }

    /// Register a shape from `(dx, dy)` pairs and return its id.
    pub fn register_shape<I, O>(&mut self, name: impl Into<String>, movement: Movement, offsets: I) -> ShapeId
    where
        I: IntoIterator<Item = O>,
        O: Into<Offset>,
    {
        let index = u16::try_from(self.shapes.len())
            .unwrap_or_else(|_| panic!("Catalog supports at most 65536 shapes"));
        let id = ShapeId::new(index);
        self.shapes.push(Shape::new(id, name, movement, offsets));
        id
    }

    /// Get a color by ID.
    #[must_use]
    pub fn color(&self, id: ColorId) -> Option<&ColorDef> {
        self.colors.get(id.index())
    }

    /// Get a shape by ID.
    #[must_use]
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.raw() as usize)
    }

    /// Get a shape by ID, panicking if not found.
    ///
    /// Creatures only ever carry ids issued by this catalog.
    #[must_use]
    pub fn shape_unchecked(&self, id: ShapeId) -> &Shape {
        self.shape(id).expect("Shape not found in catalog")
    }

    /// All colors in registration order.
    #[must_use]
    pub fn colors(&self) -> &[ColorDef] {
        &self.colors
    }

    /// All shapes in registration order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Exit slot for a color, or `None` if it falls past the fixed slots.
    #[must_use]
    pub fn exit_slot(&self, color: ColorId) -> Option<usize> {
        let index = color.index();
        (index < self.colors.len() && index < EXIT_SLOT_COUNT).then_some(index)
    }

    /// Colors that have no exit slot and so can never be cleared.
    pub fn unexitable_colors(&self) -> impl Iterator<Item = &ColorDef> {
        self.colors.iter().skip(EXIT_SLOT_COUNT)
    }

    /// Draw a uniformly random shape.
    pub fn random_shape(&self, rng: &mut GameRng) -> Option<&Shape> {
        rng.choose(&self.shapes)
    }

    /// Draw a uniformly random color.
    pub fn random_color(&self, rng: &mut GameRng) -> Option<ColorId> {
        rng.choose(&self.colors).map(|c| c.id)
    }

    /// The smallest shape (fewest cells, earliest registered on ties).
    ///
    /// Used for creatures spawned out of empty ice.
    #[must_use]
    pub fn smallest_shape(&self) -> Option<&Shape> {
        self.shapes.iter().min_by_key(|s| s.cell_count())
    }

    /// Check that the catalog can drive a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyCatalog("colors"));
        }
        if self.shapes.is_empty() {
            return Err(ConfigError::EmptyCatalog("shapes"));
        }
        for shape in &self.shapes {
            shape.validate()?;
        }
        Ok(())
    }
}
