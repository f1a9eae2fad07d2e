use pathfinding::prelude::astar;
use rustc_hash::FxHashSet;
use std::time::Instant;

use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm};
use crate::algorithms::cost::{edge_cost_tenths, Heuristic};
use crate::algorithms::path::Path;
use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use crate::statistics::SearchStatistics;

/// A* from the `pathfinding` crate, run on integer tenths of the cost model.
///
/// Used to cross-check [`crate::algorithms::a_star::AStar`]. Its tie-breaking
/// differs, so equal-cost paths may take different cells.
#[derive(Debug, Default)]
pub struct ReferenceAStar {
    heuristic: Heuristic,
    last_stats: SearchStatistics,
}

impl ReferenceAStar {
    pub fn new() -> Self {
        ReferenceAStar::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        ReferenceAStar {
            heuristic,
            last_stats: SearchStatistics::default(),
        }
    }
}

impl PathfindingAlgorithm for ReferenceAStar {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn find_path(&mut self, grid: &Grid, start: Position, goal: Position) -> Result<Path> {
        validate_endpoints(grid, start, goal)?;

        let started_at = Instant::now();
        let heuristic = self.heuristic;
        let mut expanded = 0;
        let mut seen = FxHashSet::default();
        seen.insert(start);

        let result = astar(
            &start,
            |p| {
                expanded += 1;
                let successors: Vec<(Position, u32)> = grid
                    .neighbors(p)
                    .into_iter()
                    .map(|n| (n, edge_cost_tenths(*p, n)))
                    .collect();
                seen.extend(successors.iter().map(|(n, _)| *n));
                successors
            },
            |p| heuristic.estimate_tenths(*p, goal),
            |p| *p == goal,
        );

        let mut stats = SearchStatistics {
            expanded,
            discovered: seen.len(),
            elapsed: started_at.elapsed(),
            ..Default::default()
        };

        // The result from `astar` is a tuple `(path, cost)`; the float cost is
        // recomputed from the cells so it compares directly with AStar.
        let outcome = match result {
            Some((cells, _)) => {
                let path = Path::from_cells(cells);
                stats.record_path(&path);
                Ok(path)
            }
            None => Err(Error::Exhausted),
        };
        self.last_stats = stats;
        outcome
    }

    fn statistics(&self) -> SearchStatistics {
        self.last_stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_open_grid_diagonal() {
        let grid = Grid::new(5).unwrap();
        let mut reference = ReferenceAStar::new();
        let path = reference
            .find_path(&grid, Position::new(0, 0), Position::new(4, 4))
            .unwrap();
        assert_eq!(path.len(), 5);
        assert!((path.cost() - 5.6).abs() < 1e-9);
        assert_eq!(reference.statistics().path_cells, 5);
    }

    #[test]
    fn reports_exhaustion_and_bad_endpoints() {
        let mut grid = Grid::new(3).unwrap();
        for row in 0..3 {
            grid.set_blocked(Position::new(row, 1), true).unwrap();
        }
        let mut reference = ReferenceAStar::with_heuristic(Heuristic::Octile);
        assert!(matches!(
            reference.find_path(&grid, Position::new(0, 0), Position::new(0, 2)),
            Err(Error::Exhausted)
        ));
        // Only the three cells left of the wall are reachable.
        assert_eq!(reference.statistics().discovered, 3);
        assert!(matches!(
            reference.find_path(&grid, Position::new(0, 1), Position::new(0, 2)),
            Err(Error::InvalidEndpoints(_))
        ));
    }
}
