use clap::ValueEnum;

use crate::grid::Position;

/// Cost of a horizontal or vertical move.
pub const ORTHOGONAL_COST: f64 = 1.0;
/// Cost of a diagonal move. Deliberately the literal 1.4, not sqrt(2).
pub const DIAGONAL_COST: f64 = 1.4;

/// Traversal cost between two adjacent cells.
///
/// `a` and `b` must be neighbours as reported by [`crate::grid::Grid::neighbors`].
pub fn edge_cost(a: Position, b: Position) -> f64 {
    let d_row = a.row.abs_diff(b.row);
    let d_col = a.col.abs_diff(b.col);
    debug_assert!(
        d_row <= 1 && d_col <= 1 && d_row + d_col > 0,
        "edge_cost called on non-adjacent cells {a} and {b}"
    );
    if d_row + d_col == 2 {
        DIAGONAL_COST
    } else {
        ORTHOGONAL_COST
    }
}

/// Remaining-distance estimate used to order the frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Heuristic {
    /// `|d_row| + |d_col|`. Overestimates whenever a diagonal step helps,
    /// so routes around obstacles are not guaranteed optimal.
    #[default]
    Manhattan,
    /// `1.4 * min + (max - min)`. Exact on an open grid; never overestimates.
    Octile,
}

impl Heuristic {
    pub fn estimate(self, cell: Position, goal: Position) -> f64 {
        let d_row = cell.row.abs_diff(goal.row) as f64;
        let d_col = cell.col.abs_diff(goal.col) as f64;
        match self {
            Heuristic::Manhattan => d_row + d_col,
            Heuristic::Octile => {
                let (low, high) = if d_row < d_col { (d_row, d_col) } else { (d_col, d_row) };
                DIAGONAL_COST * low + (high - low)
            }
        }
    }

    /// The same estimate in integer tenths, for solvers that need `Ord` costs.
    pub fn estimate_tenths(self, cell: Position, goal: Position) -> u32 {
        let d_row = cell.row.abs_diff(goal.row) as u32;
        let d_col = cell.col.abs_diff(goal.col) as u32;
        match self {
            Heuristic::Manhattan => 10 * (d_row + d_col),
            Heuristic::Octile => 14 * d_row.min(d_col) + 10 * (d_row.max(d_col) - d_row.min(d_col)),
        }
    }
}

/// Manhattan distance, the default heuristic.
pub fn heuristic(cell: Position, goal: Position) -> f64 {
    Heuristic::Manhattan.estimate(cell, goal)
}

/// [`edge_cost`] in integer tenths.
pub fn edge_cost_tenths(a: Position, b: Position) -> u32 {
    if a.row != b.row && a.col != b.col {
        14
    } else {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orthogonal_and_diagonal_costs() {
        let c = Position::new(2, 2);
        assert_eq!(edge_cost(c, Position::new(3, 2)), 1.0);
        assert_eq!(edge_cost(c, Position::new(2, 1)), 1.0);
        assert_eq!(edge_cost(c, Position::new(1, 1)), 1.4);
        assert_eq!(edge_cost(c, Position::new(3, 3)), 1.4);
        assert_eq!(edge_cost_tenths(c, Position::new(1, 3)), 14);
        assert_eq!(edge_cost_tenths(c, Position::new(1, 2)), 10);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn non_adjacent_edge_is_a_contract_violation() {
        edge_cost(Position::new(0, 0), Position::new(0, 2));
    }

    #[test]
    fn manhattan_estimate() {
        assert_eq!(heuristic(Position::new(0, 0), Position::new(4, 4)), 8.0);
        assert_eq!(heuristic(Position::new(3, 1), Position::new(0, 2)), 4.0);
        assert_eq!(heuristic(Position::new(2, 2), Position::new(2, 2)), 0.0);
    }

    #[test]
    fn octile_estimate_matches_open_grid_cost() {
        let h = Heuristic::Octile;
        assert!((h.estimate(Position::new(0, 0), Position::new(4, 4)) - 5.6).abs() < 1e-9);
        assert!((h.estimate(Position::new(0, 0), Position::new(1, 3)) - 3.4).abs() < 1e-9);
        assert_eq!(h.estimate_tenths(Position::new(0, 0), Position::new(1, 3)), 34);
        assert_eq!(
            Heuristic::Manhattan.estimate_tenths(Position::new(0, 0), Position::new(1, 3)),
            40
        );
    }
}
