use crate::algorithms::path::Path;
use crate::error::{EndpointProblem, Error, Result};
use crate::grid::{Grid, Position};
use crate::statistics::SearchStatistics;

pub trait PathfindingAlgorithm {
    /// Short identifier used in reports and on the command line.
    fn name(&self) -> &'static str;

    fn find_path(&mut self, grid: &Grid, start: Position, goal: Position) -> Result<Path>;

    /// Counters from the most recent `find_path` call.
    fn statistics(&self) -> SearchStatistics {
        SearchStatistics::default()
    }
}

/// Rejects endpoints that are off the grid, blocked, or identical.
pub fn validate_endpoints(grid: &Grid, start: Position, goal: Position) -> Result<()> {
    grid.check(start)?;
    grid.check(goal)?;
    if grid.is_blocked(start)? {
        return Err(Error::InvalidEndpoints(EndpointProblem::StartBlocked));
    }
    if grid.is_blocked(goal)? {
        return Err(Error::InvalidEndpoints(EndpointProblem::GoalBlocked));
    }
    if start == goal {
        return Err(Error::InvalidEndpoints(EndpointProblem::SameCell));
    }
    Ok(())
}
