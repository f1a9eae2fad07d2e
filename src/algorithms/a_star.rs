use rustc_hash::{FxHashMap, FxHashSet};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, trace};

use crate::algorithms::common::{validate_endpoints, PathfindingAlgorithm};
use crate::algorithms::cost::{edge_cost, Heuristic};
use crate::algorithms::path::{reconstruct, Path};
use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use crate::observer::{CellRole, NoopObserver, SearchObserver};
use crate::statistics::SearchStatistics;

/// Lifecycle of one [`SearchEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Ready,
    Running,
    Succeeded,
    Exhausted,
    Cancelled,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SearchState::Succeeded | SearchState::Exhausted | SearchState::Cancelled
        )
    }
}

/// Outcome of a single [`SearchEngine::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// One cell was expanded; the search continues.
    Expanded(Position),
    Succeeded(Path),
    Exhausted,
    Cancelled,
}

/// Frontier entry. Ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// priority first and, among equal priorities, the earliest insertion.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: f64,
    order: u64,
    pos: Position,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed comparison to make BinaryHeap a min-heap
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Step-wise A* over a borrowed [`Grid`].
///
/// All tables live in the engine and are dropped with it, so every search
/// starts from a clean slate while the grid itself is reused. The grid is
/// borrowed immutably for the engine's lifetime and cannot change mid-search.
pub struct SearchEngine<'g> {
    grid: &'g Grid,
    start: Position,
    goal: Position,
    heuristic: Heuristic,
    state: SearchState,
    frontier: BinaryHeap<FrontierEntry>,
    best_cost: FxHashMap<Position, f64>,
    predecessor: FxHashMap<Position, Option<Position>>,
    members: FxHashSet<Position>,
    closed: FxHashSet<Position>,
    insertion_counter: u64,
    path: Option<Path>,
    stats: SearchStatistics,
    started_at: Option<Instant>,
}

impl<'g> SearchEngine<'g> {
    /// Validates the endpoints and seeds the frontier with `start`.
    pub fn new(grid: &'g Grid, start: Position, goal: Position, heuristic: Heuristic) -> Result<Self> {
        validate_endpoints(grid, start, goal)?;

        let mut engine = SearchEngine {
            grid,
            start,
            goal,
            heuristic,
            state: SearchState::Ready,
            frontier: BinaryHeap::new(),
            best_cost: FxHashMap::default(),
            predecessor: FxHashMap::default(),
            members: FxHashSet::default(),
            closed: FxHashSet::default(),
            insertion_counter: 0,
            path: None,
            stats: SearchStatistics::default(),
            started_at: None,
        };

        engine.best_cost.insert(start, 0.0);
        engine.predecessor.insert(start, None);
        engine.members.insert(start);
        engine.frontier.push(FrontierEntry {
            priority: 0.0,
            order: 0,
            pos: start,
        });
        engine.stats.discovered = 1;
        Ok(engine)
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Lowest cost from start found so far; `f64::INFINITY` if unreached.
    pub fn best_cost(&self, pos: Position) -> f64 {
        self.best_cost.get(&pos).copied().unwrap_or(f64::INFINITY)
    }

    /// Whether `pos` is currently queued and not yet expanded.
    pub fn is_pending(&self, pos: Position) -> bool {
        self.members.contains(&pos)
    }

    pub fn is_closed(&self, pos: Position) -> bool {
        self.closed.contains(&pos)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn statistics(&self) -> &SearchStatistics {
        &self.stats
    }

    /// Aborts a search that has not finished. Terminal states are kept.
    pub fn cancel(&mut self) {
        if !self.state.is_terminal() {
            debug!("Search {} -> {} cancelled", self.start, self.goal);
            self.finish(SearchState::Cancelled);
        }
    }

    /// Expands at most one cell, then hands control back to the caller.
    ///
    /// Once the engine is in a terminal state every further call reports
    /// that same outcome again.
    pub fn step<O: SearchObserver + ?Sized>(&mut self, observer: &mut O) -> Step {
        match self.state {
            SearchState::Ready => {
                debug!(
                    "Starting search {} -> {} on {}x{} grid ({:?} heuristic)",
                    self.start,
                    self.goal,
                    self.grid.size(),
                    self.grid.size(),
                    self.heuristic
                );
                self.started_at = Some(Instant::now());
                self.state = SearchState::Running;
            }
            SearchState::Running => {}
            SearchState::Succeeded => return Step::Succeeded(self.path.clone().unwrap_or_default()),
            SearchState::Exhausted => return Step::Exhausted,
            SearchState::Cancelled => return Step::Cancelled,
        }

        let Some(entry) = self.frontier.pop() else {
            debug!(
                "Frontier exhausted after {} expansions, {} unreachable",
                self.stats.expanded, self.goal
            );
            self.finish(SearchState::Exhausted);
            return Step::Exhausted;
        };

        let current = entry.pos;
        self.members.remove(&current);
        let neighbors = self.grid.neighbors(&current);
        self.stats.expanded += 1;

        if current == self.goal {
            let path = Path::from_cells(reconstruct(&self.predecessor, self.goal));
            for &cell in path.cells() {
                observer.on_cell(cell, CellRole::Path);
            }
            self.stats.record_path(&path);
            self.finish(SearchState::Succeeded);
            debug!(
                "Reached {} with {} cells, cost {:.1}, after {} expansions",
                self.goal,
                path.len(),
                path.cost(),
                self.stats.expanded
            );
            self.path = Some(path.clone());
            return Step::Succeeded(path);
        }

        let current_cost = self.best_cost(current);
        for neighbor in neighbors {
            if self.closed.contains(&neighbor) {
                continue;
            }
            let tentative = current_cost + edge_cost(current, neighbor);
            if tentative < self.best_cost(neighbor) {
                self.predecessor.insert(neighbor, Some(current));
                self.best_cost.insert(neighbor, tentative);
                self.stats.relaxations += 1;

                if self.members.insert(neighbor) {
                    self.insertion_counter += 1;
                    let priority = self.heuristic.estimate(neighbor, self.goal) + tentative;
                    self.frontier.push(FrontierEntry {
                        priority,
                        order: self.insertion_counter,
                        pos: neighbor,
                    });
                    self.stats.discovered += 1;
                    observer.on_cell(neighbor, CellRole::Frontier);
                }
            }
        }

        self.closed.insert(current);
        if current != self.start {
            observer.on_cell(current, CellRole::Closed);
        }
        trace!(
            "Expanded {} (f = {:.1}, g = {:.1}), frontier size {}",
            current,
            entry.priority,
            current_cost,
            self.frontier.len()
        );
        Step::Expanded(current)
    }

    /// Steps until a terminal state. `abort` is polled before every step;
    /// returning `true` cancels the search.
    pub fn run<O, A>(&mut self, observer: &mut O, mut abort: A) -> Result<Path>
    where
        O: SearchObserver + ?Sized,
        A: FnMut() -> bool,
    {
        loop {
            if abort() {
                self.cancel();
            }
            match self.step(observer) {
                Step::Expanded(_) => continue,
                Step::Succeeded(path) => return Ok(path),
                Step::Exhausted => return Err(Error::Exhausted),
                Step::Cancelled => return Err(Error::Cancelled),
            }
        }
    }

    fn finish(&mut self, state: SearchState) {
        self.state = state;
        if let Some(started_at) = self.started_at {
            self.stats.elapsed = started_at.elapsed();
        }
    }
}

/// Finds a path with the default Manhattan heuristic and no observer.
pub fn search(grid: &Grid, start: Position, goal: Position) -> Result<Path> {
    search_with(grid, start, goal, Heuristic::default(), &mut NoopObserver, || false)
}

/// Full-control search: custom heuristic, observer callbacks, and an abort
/// predicate polled once per expansion.
pub fn search_with<O, A>(
    grid: &Grid,
    start: Position,
    goal: Position,
    heuristic: Heuristic,
    observer: &mut O,
    abort: A,
) -> Result<Path>
where
    O: SearchObserver + ?Sized,
    A: FnMut() -> bool,
{
    SearchEngine::new(grid, start, goal, heuristic)?.run(observer, abort)
}

/// [`SearchEngine`] behind the [`PathfindingAlgorithm`] interface.
#[derive(Debug, Default)]
pub struct AStar {
    heuristic: Heuristic,
    last_stats: SearchStatistics,
}

impl AStar {
    /// Creates an A* provider using the Manhattan heuristic.
    pub fn new() -> Self {
        AStar::default()
    }

    pub fn with_heuristic(heuristic: Heuristic) -> Self {
        AStar {
            heuristic,
            last_stats: SearchStatistics::default(),
        }
    }
}

impl PathfindingAlgorithm for AStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn find_path(&mut self, grid: &Grid, start: Position, goal: Position) -> Result<Path> {
        let mut engine = SearchEngine::new(grid, start, goal, self.heuristic)?;
        let result = engine.run(&mut NoopObserver, || false);
        self.last_stats = engine.statistics().clone();
        result
    }

    fn statistics(&self) -> SearchStatistics {
        self.last_stats.clone()
    }
}
