use rustc_hash::FxHashMap;

use crate::algorithms::cost::edge_cost;
use crate::grid::Position;

/// Ordered cells from start to goal, both inclusive, with their summed cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    cells: Vec<Position>,
    cost: f64,
}

impl Path {
    /// Builds a path from consecutive adjacent cells, summing edge costs from
    /// the start so the total matches what a search accumulates.
    pub fn from_cells(cells: Vec<Position>) -> Self {
        let cost = cells.windows(2).map(|w| edge_cost(w[0], w[1])).sum();
        Path { cells, cost }
    }

    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Number of cells, endpoints included.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves, one less than the cell count.
    pub fn steps(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn start(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Position> {
        self.cells.last().copied()
    }
}

/// Walks `predecessor` back from `goal` until a cell with no predecessor
/// (the start), then reverses. Returns an empty vector when `goal` was never
/// reached.
pub fn reconstruct(
    predecessor: &FxHashMap<Position, Option<Position>>,
    goal: Position,
) -> Vec<Position> {
    let mut cells = Vec::new();
    let mut current = goal;
    loop {
        match predecessor.get(&current) {
            Some(&Some(previous)) => {
                cells.push(current);
                current = previous;
            }
            Some(&None) => {
                cells.push(current);
                break;
            }
            None => return Vec::new(),
        }
    }
    cells.reverse();
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(cells: &[(usize, usize)]) -> FxHashMap<Position, Option<Position>> {
        let mut map = FxHashMap::default();
        let mut previous = None;
        for &(r, c) in cells {
            let p = Position::new(r, c);
            map.insert(p, previous);
            previous = Some(p);
        }
        map
    }

    #[test]
    fn walks_back_to_start_and_reverses() {
        let pred = chain(&[(0, 0), (1, 1), (1, 2), (2, 3)]);
        let cells = reconstruct(&pred, Position::new(2, 3));
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(1, 1),
                Position::new(1, 2),
                Position::new(2, 3)
            ]
        );
    }

    #[test]
    fn partial_walk_from_intermediate_cell() {
        let pred = chain(&[(0, 0), (0, 1), (0, 2)]);
        assert_eq!(
            reconstruct(&pred, Position::new(0, 1)),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
    }

    #[test]
    fn unreached_goal_gives_empty_path() {
        let pred = chain(&[(0, 0), (0, 1)]);
        assert!(reconstruct(&pred, Position::new(5, 5)).is_empty());
    }

    #[test]
    fn path_cost_sums_edges() {
        let path = Path::from_cells(vec![
            Position::new(0, 0),
            Position::new(1, 1),
            Position::new(1, 2),
        ]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.steps(), 2);
        assert!((path.cost() - 2.4).abs() < 1e-9);
        assert_eq!(path.start(), Some(Position::new(0, 0)));
        assert_eq!(path.goal(), Some(Position::new(1, 2)));
    }
}
