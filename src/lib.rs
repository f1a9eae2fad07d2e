//! A* shortest paths on square grids with obstacles.
//!
//! The search core is [`algorithms::a_star::SearchEngine`], a step-wise A*
//! that hands control back to its caller after every expansion and reports
//! progress through a [`observer::SearchObserver`]. Everything needed to
//! draw or edit the board (pixel mapping, click handling, a terminal
//! renderer) sits beside the core and only talks to it through those hooks.
//!
//! ```
//! use grid_astar::{build_grid, search, set_obstacle, Position};
//!
//! let (mut grid, _viewport) = build_grid(5, 20).unwrap();
//! set_obstacle(&mut grid, Position::new(1, 1), true).unwrap();
//! let path = search(&grid, Position::new(0, 0), Position::new(4, 4)).unwrap();
//! assert_eq!(path.start(), Some(Position::new(0, 0)));
//! assert_eq!(path.goal(), Some(Position::new(4, 4)));
//! ```

pub mod algorithms;
pub mod batch_simulation;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod observer;
pub mod render;
pub mod session;
pub mod simulation;
pub mod statistics;

pub use algorithms::a_star::{search, search_with, SearchEngine, SearchState, Step};
pub use algorithms::cost::{edge_cost, heuristic, Heuristic};
pub use algorithms::path::{reconstruct, Path};
pub use error::{EndpointProblem, Error, Result};
pub use grid::{Grid, Position};
pub use observer::{CellRole, SearchObserver};
pub use session::{Session, Viewport};

/// Creates an all-passable `rows x rows` grid plus the viewport a renderer
/// uses to map `cell_size`-pixel cells.
pub fn build_grid(rows: usize, cell_size: u32) -> Result<(Grid, Viewport)> {
    Ok((Grid::new(rows)?, Viewport::new(rows, cell_size)?))
}

/// Blocks or unblocks one cell. Out-of-bounds positions leave the grid as it
/// was and return [`Error::OutOfBounds`].
pub fn set_obstacle(grid: &mut Grid, pos: Position, blocked: bool) -> Result<()> {
    grid.set_blocked(pos, blocked)
}
