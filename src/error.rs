//! Error types for grid_astar

use thiserror::Error;

use crate::grid::Position;

/// Why a start/goal pair was rejected before searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointProblem {
    StartBlocked,
    GoalBlocked,
    SameCell,
    Missing,
}

impl std::fmt::Display for EndpointProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            EndpointProblem::StartBlocked => "start cell is blocked",
            EndpointProblem::GoalBlocked => "goal cell is blocked",
            EndpointProblem::SameCell => "start and goal are the same cell",
            EndpointProblem::Missing => "start and goal have not both been placed",
        };
        f.write_str(msg)
    }
}

/// grid_astar error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("{pos} is outside a {size}x{size} grid")]
    OutOfBounds { pos: Position, size: usize },

    #[error("Invalid endpoints: {0}")]
    InvalidEndpoints(EndpointProblem),

    #[error("Session is locked until reset")]
    Locked,

    #[error("Frontier exhausted without reaching the goal")]
    Exhausted,

    #[error("Search cancelled by host")]
    Cancelled,

    #[error("Invalid grid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Layout error on line {line}: {message}")]
    Layout { line: usize, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for the two outcomes a finished search can report instead of a path.
    pub fn is_search_failure(&self) -> bool {
        matches!(self, Error::Exhausted | Error::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
