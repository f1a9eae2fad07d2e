//! Hooks for watching a search from the outside.
//!
//! The engine never stores display state. Anything that wants to draw the
//! search (a terminal frame, a GUI, a test recorder) implements
//! [`SearchObserver`] and receives `(cell, role)` events as they happen.

use crate::grid::Position;

/// What a cell has just become, from an observer's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// Discovered and queued for expansion.
    Frontier,
    /// Expanded. Never reported for the start cell.
    Closed,
    /// Part of the final path, start and goal included.
    Path,
}

pub trait SearchObserver {
    fn on_cell(&mut self, pos: Position, role: CellRole);
}

impl<F> SearchObserver for F
where
    F: FnMut(Position, CellRole),
{
    fn on_cell(&mut self, pos: Position, role: CellRole) {
        self(pos, role)
    }
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_cell(&mut self, _pos: Position, _role: CellRole) {}
}

/// Observer that keeps every event in order. Handy for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub events: Vec<(Position, CellRole)>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells that received `role`, in event order.
    pub fn cells_with(&self, role: CellRole) -> Vec<Position> {
        self.events
            .iter()
            .filter(|(_, r)| *r == role)
            .map(|(p, _)| *p)
            .collect()
    }
}

impl SearchObserver for EventLog {
    fn on_cell(&mut self, pos: Position, role: CellRole) {
        self.events.push((pos, role));
    }
}
