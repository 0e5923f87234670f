//! Exit registry: colored exits bound to board-edge cells.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{Catalog, ColorId, EXIT_SLOT_COUNT};
use crate::core::Cell;

/// A colored exit on the board edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exit {
    /// Color that may leave through this exit.
    pub color: ColorId,
    /// Edge cell the exit is bound to.
    pub cell: Cell,
}

/// The six fixed exit positions for a board of the given size.
///
/// Order: top-left, top-right, bottom-left, bottom-right, left-middle,
/// right-middle.
#[must_use]
pub fn exit_positions(size: usize) -> [Cell; EXIT_SLOT_COUNT] {
    let n = size as i32;
    [
        Cell::new(0, 1),
        Cell::new(0, n - 2),
        Cell::new(n - 1, 1),
        Cell::new(n - 1, n - 2),
        Cell::new(n / 2, 0),
        Cell::new(n / 2, n - 1),
    ]
}

fn on_edge(size: usize, cell: Cell) -> bool {
    let last = size as i32 - 1;
    let in_bounds = cell.row >= 0 && cell.row <= last && cell.col >= 0 && cell.col <= last;
    in_bounds && (cell.row == 0 || cell.col == 0 || cell.row == last || cell.col == last)
}

/// Exits for one level.
///
/// At most one exit per cell; binding a second exit to a cell replaces the
/// first.
///
/// ## Example
///
/// ```
/// use rust_critters::catalog::ColorId;
/// use rust_critters::core::Cell;
/// use rust_critters::exits::ExitRegistry;
///
/// let red = ColorId::new(0);
/// let mut exits = ExitRegistry::new(12);
/// exits.bind(red, Cell::new(0, 1));
///
/// assert!(exits.matches(Cell::new(0, 1), red));
/// assert!(!exits.matches(Cell::new(0, 2), red));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExitRegistry {
    size: usize,
    exits: Vec<Exit>,
    by_cell: FxHashMap<Cell, usize>,
}

impl ExitRegistry {
    /// Create an empty registry for a board of the given size.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            exits: Vec::new(),
            by_cell: FxHashMap::default(),
        }
    }

    /// One exit per catalog color, round-robin over the fixed edge positions.
    ///
    /// Colors past the last slot get no exit and are logged.
    #[must_use]
    pub fn for_catalog(catalog: &Catalog, size: usize) -> Self {
        let mut registry = Self::new(size);
        let positions = exit_positions(size);

        for color in catalog.colors() {
            if let Some(slot) = catalog.exit_slot(color.id) {
                registry.bind(color.id, positions[slot]);
            }
        }
        for color in catalog.unexitable_colors() {
            warn!(color = %color.name, "no exit slot left; color cannot be cleared");
        }
        registry
    }

    /// Bind an exit of `color` to an edge cell.
    ///
    /// Panics if `cell` is not on the board edge.
    pub fn bind(&mut self, color: ColorId, cell: Cell) {
        if !on_edge(self.size, cell) {
            panic!("Exit cell {} is not on the edge of a {}x{} board", cell, self.size, self.size);
        }

        let exit = Exit { color, cell };
        match self.by_cell.get(&cell) {
            Some(&i) => self.exits[i] = exit,
            None => {
                self.by_cell.insert(cell, self.exits.len());
                self.exits.push(exit);
            }
        }
    }

    /// Exit bound to a cell.
    #[must_use]
    pub fn exit_at(&self, cell: Cell) -> Option<&Exit> {
        self.by_cell.get(&cell).map(|&i| &self.exits[i])
    }

    /// First exit of a color.
    #[must_use]
    pub fn exit_for(&self, color: ColorId) -> Option<&Exit> {
        self.exits.iter().find(|e| e.color == color)
    }

    /// True iff the exit bound to `cell` has the given color.
    #[must_use]
    pub fn matches(&self, cell: Cell, color: ColorId) -> bool {
        self.exit_at(cell).is_some_and(|e| e.color == color)
    }

    /// Iterate over exits in binding order.
    pub fn iter(&self) -> impl Iterator<Item = &Exit> {
        self.exits.iter()
    }

    /// Number of bound exits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exits.len()
    }

    /// Check if no exits are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Movement;

    #[test]
    fn test_positions_for_12() {
        let p = exit_positions(12);
        assert_eq!(p[0], Cell::new(0, 1));
        assert_eq!(p[1], Cell::new(0, 10));
        assert_eq!(p[2], Cell::new(11, 1));
        assert_eq!(p[3], Cell::new(11, 10));
        assert_eq!(p[4], Cell::new(6, 0));
        assert_eq!(p[5], Cell::new(6, 11));

        for cell in p {
            assert!(on_edge(12, cell));
        }
    }

    #[test]
    fn test_positions_distinct_at_min_size() {
        let p = exit_positions(crate::core::MIN_BOARD_SIZE);
        for i in 0..p.len() {
            for j in i + 1..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn test_for_standard_catalog() {
        let catalog = Catalog::standard();
        let exits = ExitRegistry::for_catalog(&catalog, 12);

        assert_eq!(exits.len(), 6);
        let red = ColorId::new(0);
        assert_eq!(exits.exit_for(red).unwrap().cell, Cell::new(0, 1));
        assert!(exits.matches(Cell::new(0, 1), red));
        assert!(!exits.matches(Cell::new(0, 10), red));
    }

    #[test]
    fn test_extra_colors_get_no_exit() {
        let mut catalog = Catalog::new();
        for i in 0..8 {
            catalog.register_color(format!("c{}", i));
        }
        catalog.register_shape("dot", Movement::Legged, [(0, 0)]);

        let exits = ExitRegistry::for_catalog(&catalog, 10);
        assert_eq!(exits.len(), 6);
        assert!(exits.exit_for(ColorId::new(6)).is_none());
        assert!(exits.exit_for(ColorId::new(7)).is_none());
    }

    #[test]
    fn test_rebind_replaces() {
        let mut exits = ExitRegistry::new(8);
        exits.bind(ColorId::new(0), Cell::new(0, 3));
        exits.bind(ColorId::new(1), Cell::new(0, 3));

        assert_eq!(exits.len(), 1);
        assert!(exits.matches(Cell::new(0, 3), ColorId::new(1)));
        assert!(!exits.matches(Cell::new(0, 3), ColorId::new(0)));
    }

    #[test]
    #[should_panic(expected = "not on the edge")]
    fn test_bind_interior_panics() {
        let mut exits = ExitRegistry::new(8);
        exits.bind(ColorId::new(0), Cell::new(3, 3));
    }
}
