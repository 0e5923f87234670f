//! Orthogonal path planning.
//!
//! Paths step the row toward the target first, then the column, one cell per
//! step. There is no obstacle avoidance: the planner never looks at the grid.
//! Collisions are the controller's business when each step commits.

use crate::core::Cell;

/// Compute the step sequence from `from` to `to`.
///
/// The result excludes `from` and ends at `to`; it is empty iff the two are
/// equal.
///
/// ```
/// use rust_critters::board::compute_path;
/// use rust_critters::core::Cell;
///
/// let path = compute_path(Cell::new(0, 0), Cell::new(2, 3));
/// assert_eq!(
///     path,
///     vec![
///         Cell::new(1, 0),
///         Cell::new(2, 0),
///         Cell::new(2, 1),
///         Cell::new(2, 2),
///         Cell::new(2, 3),
///     ]
/// );
/// ```
#[must_use]
pub fn compute_path(from: Cell, to: Cell) -> Vec<Cell> {
    let mut path = Vec::with_capacity(path_length(from, to) as usize);
    let mut current = from;

    let row_step = (to.row - from.row).signum();
    while current.row != to.row {
        current.row += row_step;
        path.push(current);
    }

    let col_step = (to.col - from.col).signum();
    while current.col != to.col {
        current.col += col_step;
        path.push(current);
    }

    path
}

/// Number of steps `compute_path` produces between two cells.
#[must_use]
pub fn path_length(from: Cell, to: Cell) -> u32 {
    from.manhattan(to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_cell_is_empty() {
        assert!(compute_path(Cell::new(3, 3), Cell::new(3, 3)).is_empty());
    }

    #[test]
    fn test_rows_before_columns() {
        let path = compute_path(Cell::new(0, 0), Cell::new(2, 3));
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], Cell::new(1, 0));
        assert_eq!(path[1], Cell::new(2, 0));
        assert_eq!(path[4], Cell::new(2, 3));
    }

    #[test]
    fn test_negative_direction() {
        let path = compute_path(Cell::new(4, 4), Cell::new(2, 3));
        assert_eq!(path, vec![Cell::new(3, 4), Cell::new(2, 4), Cell::new(2, 3)]);
    }

    #[test]
    fn test_single_axis() {
        let path = compute_path(Cell::new(1, 5), Cell::new(1, 2));
        assert_eq!(path, vec![Cell::new(1, 4), Cell::new(1, 3), Cell::new(1, 2)]);

        let path = compute_path(Cell::new(0, 1), Cell::new(2, 1));
        assert_eq!(path, vec![Cell::new(1, 1), Cell::new(2, 1)]);
    }

    #[test]
    fn test_path_length_matches() {
        let from = Cell::new(7, 1);
        let to = Cell::new(0, 9);
        assert_eq!(compute_path(from, to).len() as u32, path_length(from, to));
    }
}
