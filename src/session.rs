//! Editing state between searches: the grid, endpoint designation, and the
//! pixel mapping an interactive front end clicks through.

use tracing::{debug, info};

use crate::algorithms::a_star::SearchEngine;
use crate::algorithms::cost::Heuristic;
use crate::algorithms::path::Path;
use crate::error::{EndpointProblem, Error, Result};
use crate::grid::{Grid, Position};
use crate::observer::SearchObserver;

/// Maps pixels to cells for a square board of `rows x rows` cells, each
/// `cell_size` pixels wide. Rows grow downwards (`y`), columns rightwards (`x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    rows: usize,
    cell_size: u32,
}

impl Viewport {
    pub fn new(rows: usize, cell_size: u32) -> Result<Self> {
        if rows == 0 || cell_size == 0 {
            return Err(Error::InvalidDimensions(format!(
                "viewport needs rows > 0 and cell_size > 0, got {} and {}",
                rows, cell_size
            )));
        }
        Ok(Viewport { rows, cell_size })
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// Board width (and height) in pixels.
    pub fn width(&self) -> u64 {
        self.rows as u64 * self.cell_size as u64
    }

    pub fn cell_at(&self, x: u32, y: u32) -> Result<Position> {
        let pos = Position::new(
            (y / self.cell_size) as usize,
            (x / self.cell_size) as usize,
        );
        if pos.row < self.rows && pos.col < self.rows {
            Ok(pos)
        } else {
            Err(Error::OutOfBounds {
                pos,
                size: self.rows,
            })
        }
    }

    /// Top-left pixel of `pos`.
    pub fn cell_origin(&self, pos: Position) -> (u64, u64) {
        let size = self.cell_size as u64;
        (pos.col as u64 * size, pos.row as u64 * size)
    }
}

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    StartPlaced,
    GoalPlaced,
    WallPlaced,
    Ignored,
}

/// A grid plus start/goal designation that persists across searches.
///
/// The first click places the start, the second the goal, and every later
/// click walls off an open cell. Running a search locks editing until
/// [`Session::reset`].
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    viewport: Viewport,
    start: Option<Position>,
    goal: Option<Position>,
    heuristic: Heuristic,
    locked: bool,
}

impl Session {
    pub fn new(rows: usize, cell_size: u32) -> Result<Self> {
        let (grid, viewport) = crate::build_grid(rows, cell_size)?;
        Ok(Session {
            grid,
            viewport,
            start: None,
            goal: None,
            heuristic: Heuristic::default(),
            locked: false,
        })
    }

    /// Wraps an existing grid, e.g. a loaded layout or random walls.
    pub fn from_grid(
        grid: Grid,
        cell_size: u32,
        start: Option<Position>,
        goal: Option<Position>,
    ) -> Result<Self> {
        let viewport = Viewport::new(grid.size(), cell_size)?;
        for pos in start.iter().chain(goal.iter()) {
            grid.check(*pos)?;
        }
        Ok(Session {
            grid,
            viewport,
            start,
            goal,
            heuristic: Heuristic::default(),
            locked: false,
        })
    }

    pub fn with_heuristic(mut self, heuristic: Heuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn start(&self) -> Option<Position> {
        self.start
    }

    pub fn goal(&self) -> Option<Position> {
        self.goal
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn click(&mut self, pos: Position) -> Result<ClickOutcome> {
        self.grid.check(pos)?;
        if self.locked || !self.grid.is_passable(pos) {
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = match (self.start, self.goal) {
            (None, _) => {
                self.start = Some(pos);
                ClickOutcome::StartPlaced
            }
            (Some(start), None) if start != pos => {
                self.goal = Some(pos);
                ClickOutcome::GoalPlaced
            }
            (Some(start), Some(goal)) if start != pos && goal != pos => {
                self.grid.set_blocked(pos, true)?;
                ClickOutcome::WallPlaced
            }
            _ => ClickOutcome::Ignored,
        };
        debug!("Click at {} -> {:?}", pos, outcome);
        Ok(outcome)
    }

    pub fn click_pixel(&mut self, x: u32, y: u32) -> Result<ClickOutcome> {
        let pos = self.viewport.cell_at(x, y)?;
        self.click(pos)
    }

    /// Blocks or unblocks a cell directly. Endpoints cannot be blocked and a
    /// locked session rejects the edit with [`Error::Locked`].
    pub fn set_obstacle(&mut self, pos: Position, blocked: bool) -> Result<()> {
        self.grid.check(pos)?;
        if self.locked {
            return Err(Error::Locked);
        }
        if blocked && (Some(pos) == self.start || Some(pos) == self.goal) {
            let problem = if Some(pos) == self.start {
                EndpointProblem::StartBlocked
            } else {
                EndpointProblem::GoalBlocked
            };
            return Err(Error::InvalidEndpoints(problem));
        }
        self.grid.set_blocked(pos, blocked)
    }

    /// Stops further edits until [`Session::reset`].
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// A fresh engine over the current grid and endpoints.
    pub fn engine(&self) -> Result<SearchEngine<'_>> {
        match (self.start, self.goal) {
            (Some(start), Some(goal)) => SearchEngine::new(&self.grid, start, goal, self.heuristic),
            _ => Err(Error::InvalidEndpoints(EndpointProblem::Missing)),
        }
    }

    /// Locks the session and searches to completion.
    pub fn run<O, A>(&mut self, observer: &mut O, abort: A) -> Result<Path>
    where
        O: SearchObserver + ?Sized,
        A: FnMut() -> bool,
    {
        self.lock();
        self.engine()?.run(observer, abort)
    }

    /// Clears walls and endpoints and unlocks editing.
    pub fn reset(&mut self) {
        info!("Resetting {}x{} session", self.grid.size(), self.grid.size());
        self.grid.clear();
        self.start = None;
        self.goal = None;
        self.locked = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    #[test]
    fn viewport_maps_pixels_to_cells() {
        let viewport = Viewport::new(30, 20).unwrap();
        assert_eq!(viewport.width(), 600);
        assert_eq!(viewport.cell_at(0, 0).unwrap(), Position::new(0, 0));
        assert_eq!(viewport.cell_at(45, 19).unwrap(), Position::new(0, 2));
        assert_eq!(viewport.cell_at(599, 599).unwrap(), Position::new(29, 29));
        assert!(matches!(
            viewport.cell_at(600, 10),
            Err(Error::OutOfBounds { size: 30, .. })
        ));
        assert_eq!(viewport.cell_origin(Position::new(2, 3)), (60, 40));
        assert!(Viewport::new(5, 0).is_err());
    }

    #[test]
    fn clicks_place_start_goal_then_walls() {
        let mut session = Session::new(4, 10).unwrap();
        assert_eq!(session.click(Position::new(0, 0)).unwrap(), ClickOutcome::StartPlaced);
        // Same cell cannot become the goal.
        assert_eq!(session.click(Position::new(0, 0)).unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.click_pixel(35, 35).unwrap(), ClickOutcome::GoalPlaced);
        assert_eq!(session.goal(), Some(Position::new(3, 3)));
        assert_eq!(session.click(Position::new(1, 1)).unwrap(), ClickOutcome::WallPlaced);
        assert_eq!(session.click(Position::new(1, 1)).unwrap(), ClickOutcome::Ignored);
        assert_eq!(session.click(Position::new(3, 3)).unwrap(), ClickOutcome::Ignored);
        assert!(session.grid().is_blocked(Position::new(1, 1)).unwrap());
        assert!(session.click(Position::new(4, 0)).is_err());
    }

    #[test]
    fn search_locks_until_reset() {
        let mut session = Session::new(5, 10).unwrap();
        session.click(Position::new(0, 0)).unwrap();
        session.click(Position::new(4, 4)).unwrap();
        let path = session.run(&mut NoopObserver, || false).unwrap();
        assert_eq!(path.len(), 5);
        assert!(session.is_locked());
        assert_eq!(session.click(Position::new(2, 0)).unwrap(), ClickOutcome::Ignored);
        assert!(matches!(
            session.set_obstacle(Position::new(1, 1), true),
            Err(Error::Locked)
        ));
        assert!(!session.grid().is_blocked(Position::new(1, 1)).unwrap());

        session.reset();
        session.set_obstacle(Position::new(1, 1), true).unwrap();
        assert!(session.grid().is_blocked(Position::new(1, 1)).unwrap());
        session.set_obstacle(Position::new(1, 1), false).unwrap();
        assert!(!session.is_locked());
        assert_eq!(session.start(), None);
        assert_eq!(session.grid().blocked_count(), 0);
    }

    #[test]
    fn missing_endpoints_are_reported() {
        let mut session = Session::new(3, 10).unwrap();
        session.click(Position::new(0, 0)).unwrap();
        assert!(matches!(
            session.run(&mut NoopObserver, || false),
            Err(Error::InvalidEndpoints(EndpointProblem::Missing))
        ));
    }

    #[test]
    fn endpoints_cannot_be_walled() {
        let mut session =
            Session::from_grid(Grid::new(3).unwrap(), 10, Some(Position::new(0, 0)), None)
                .unwrap();
        assert!(matches!(
            session.set_obstacle(Position::new(0, 0), true),
            Err(Error::InvalidEndpoints(EndpointProblem::StartBlocked))
        ));
        session.set_obstacle(Position::new(1, 1), true).unwrap();
        session.set_obstacle(Position::new(1, 1), false).unwrap();
        assert_eq!(session.grid().blocked_count(), 0);
    }

    #[test]
    fn rerunning_after_reset_with_same_edits_repeats_path() {
        let mut session = Session::new(6, 10).unwrap().with_heuristic(Heuristic::Octile);
        let place = |session: &mut Session| {
            for pos in [(0, 0), (5, 5), (2, 2), (2, 3), (3, 2)] {
                session.click(Position::new(pos.0, pos.1)).unwrap();
            }
        };
        place(&mut session);
        let first = session.run(&mut NoopObserver, || false).unwrap();
        session.reset();
        place(&mut session);
        let second = session.run(&mut NoopObserver, || false).unwrap();
        assert_eq!(first, second);
    }
}
