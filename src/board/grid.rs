//! Occupancy grid for creature placement.
//!
//! The `Grid` is the single source of truth for which creature holds which
//! cell. It supports:
//! - Multi-cell placement checks against bounds and occupancy
//! - Placement and removal by creature id
//! - Cell lookup and a reverse index from creature to its cells
//!
//! Writing a placement that `can_place` would reject is a contract violation
//! and panics rather than silently corrupting occupancy.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::catalog::Shape;
use crate::core::{Cell, CreatureId};

/// `size × size` occupancy table.
///
/// ## Usage
///
/// ```
/// use rust_critters::board::Grid;
/// use rust_critters::catalog::{Movement, Shape, ShapeId};
/// use rust_critters::core::{Cell, CreatureId};
///
/// let mut grid = Grid::new(6);
/// let pair = Shape::new(ShapeId::new(0), "pair", Movement::Legged, [(0, 0), (1, 0)]);
///
/// assert!(grid.can_place(Cell::new(0, 0), &pair));
/// grid.place(CreatureId(1), Cell::new(0, 0), &pair);
///
/// assert_eq!(grid.occupant_at(Cell::new(0, 1)), Some(CreatureId(1)));
/// assert!(!grid.can_place(Cell::new(0, 1), &pair));
/// ```
#[derive(Clone, Debug)]
pub struct Grid {
    size: usize,

    /// Row-major cell occupants.
    cells: Vec<Option<CreatureId>>,

    /// Reverse index: creature -> cells it holds.
    placements: FxHashMap<CreatureId, SmallVec<[Cell; 4]>>,
}

impl Grid {
    /// Create an empty grid.
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
            placements: FxHashMap::default(),
        }
    }

    /// Board edge length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check whether a cell lies on the board.
    #[must_use]
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        let size = self.size as i64;
        let (row, col) = (cell.row as i64, cell.col as i64);
        row >= 0 && row < size && col >= 0 && col < size
    }

    /// Check whether a cell lies on the outer ring of the board.
    #[must_use]
    pub fn is_edge(&self, cell: Cell) -> bool {
        if !self.is_in_bounds(cell) {
            return false;
        }
        let last = self.size as i32 - 1;
        cell.row == 0 || cell.col == 0 || cell.row == last || cell.col == last
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.is_in_bounds(cell)
            .then(|| cell.row as usize * self.size + cell.col as usize)
    }

    /// Get the creature occupying a cell.
    ///
    /// Off-board cells are never occupied.
    #[must_use]
    pub fn occupant_at(&self, cell: Cell) -> Option<CreatureId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    /// Check whether a cell is on the board and empty.
    #[must_use]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i].is_none())
    }

    /// True iff every cell of `shape` at `anchor` is in bounds and unoccupied.
    #[must_use]
    pub fn can_place(&self, anchor: Cell, shape: &Shape) -> bool {
        shape.cells_at(anchor).all(|cell| self.is_free(cell))
    }

    /// Like `can_place`, but cells held by `id` count as free.
    ///
    /// Used when a creature re-places itself one step along a path.
    #[must_use]
    pub fn can_place_ignoring(&self, anchor: Cell, shape: &Shape, id: CreatureId) -> bool {
        shape.cells_at(anchor).all(|cell| match self.index(cell) {
            Some(i) => self.cells[i].map_or(true, |occupant| occupant == id),
            None => false,
        })
    }

    /// Write `id` into every cell of `shape` at `anchor`.
    ///
    /// Panics if the placement is invalid or `id` is already on the grid.
    pub fn place(&mut self, id: CreatureId, anchor: Cell, shape: &Shape) {
        if self.placements.contains_key(&id) {
            panic!("{} is already placed on the grid", id);
        }
        if !self.can_place(anchor, shape) {
            panic!(
                "Invalid placement of {} ('{}') at {}: out of bounds or occupied",
                id, shape.name, anchor
            );
        }

        let mut held = SmallVec::new();
        for cell in shape.cells_at(anchor) {
            if let Some(i) = self.index(cell) {
                self.cells[i] = Some(id);
                held.push(cell);
            }
        }
        self.placements.insert(id, held);
    }

    /// Clear every cell held by `id`.
    ///
    /// Returns the number of cells cleared (0 if `id` was not placed).
    pub fn vacate(&mut self, id: CreatureId) -> usize {
        let Some(held) = self.placements.remove(&id) else {
            return 0;
        };
        for &cell in &held {
            if let Some(i) = self.index(cell) {
                self.cells[i] = None;
            }
        }
        held.len()
    }

    /// Cells currently held by `id`, in shape offset order.
    #[must_use]
    pub fn cells_of(&self, id: CreatureId) -> &[Cell] {
        self.placements.get(&id).map_or(&[], |cells| cells.as_slice())
    }

    /// Check whether `id` is placed.
    #[must_use]
    pub fn contains(&self, id: CreatureId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.placements.values().map(|cells| cells.len()).sum()
    }

    /// Number of placed creatures.
    #[must_use]
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Occupied cells and their occupants, in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (Cell, CreatureId)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, occupant)| {
                let cell = Cell::new((i / size) as i32, (i % size) as i32);
                occupant.map(|id| (cell, id))
            })
    }

    /// Remove every placement.
    pub fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.placements.clear();
    }
}
