use rand::Rng;
use std::fmt;
use tracing::warn;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Neighbour offsets as (d_row, d_col): down, up, right, left, then the
/// diagonals up-left, down-left, down-right, up-right. Frontier ties are
/// broken by insertion order, so this order decides which of two equal-cost
/// routes a search returns.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (-1, -1),
    (1, -1),
    (1, 1),
    (-1, 1),
];

/// Square grid of cells, each either passable or blocked.
///
/// Cells are stored by value in a flat row-major vector; callers refer to
/// them through copyable [`Position`] keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    blocked: Vec<bool>,
}

impl Grid {
    /// Creates a `size x size` grid with every cell passable.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidDimensions(
                "grid must have at least one row".to_string(),
            ));
        }
        Ok(Grid {
            size,
            blocked: vec![false; size * size],
        })
    }

    /// Creates a grid with up to `num_walls` randomly placed walls, never on
    /// one of the `reserved` positions.
    pub fn with_random_walls<R: Rng>(
        size: usize,
        num_walls: usize,
        reserved: &[Position],
        rng: &mut R,
    ) -> Result<Self> {
        let mut grid = Grid::new(size)?;

        // Give up after a bounded number of attempts on crowded grids.
        let mut walls_placed = 0;
        let mut attempts = 0;
        while walls_placed < num_walls && attempts < num_walls * 3 {
            let pos = Position::new(rng.gen_range(0..size), rng.gen_range(0..size));
            if !reserved.contains(&pos) && !grid.blocked[grid.index(pos)] {
                let idx = grid.index(pos);
                grid.blocked[idx] = true;
                walls_placed += 1;
            }
            attempts += 1;
        }

        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Returns `OutOfBounds` unless `pos` lies on the grid.
    pub fn check(&self, pos: Position) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                pos,
                size: self.size,
            })
        }
    }

    /// Sets or clears the obstacle flag. Out-of-bounds positions leave the
    /// grid untouched and report `OutOfBounds`.
    pub fn set_blocked(&mut self, pos: Position, blocked: bool) -> Result<()> {
        if let Err(e) = self.check(pos) {
            warn!("Ignoring obstacle edit: {}", e);
            return Err(e);
        }
        let idx = self.index(pos);
        self.blocked[idx] = blocked;
        Ok(())
    }

    pub fn is_blocked(&self, pos: Position) -> Result<bool> {
        self.check(pos)?;
        Ok(self.blocked[self.index(pos)])
    }

    /// In bounds and not blocked.
    pub fn is_passable(&self, pos: Position) -> bool {
        self.contains(pos) && !self.blocked[self.index(pos)]
    }

    /// Unblocks every cell.
    pub fn clear(&mut self) {
        self.blocked.iter_mut().for_each(|b| *b = false);
    }

    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// Passable neighbours of `pos`, at most eight, in the fixed
    /// [`NEIGHBOR_OFFSETS`] order.
    ///
    /// A diagonal neighbour is kept even when both orthogonal cells beside
    /// it are blocked, so paths may squeeze through wall corners.
    ///
    /// Off-grid positions have no neighbours.
    pub fn neighbors(&self, pos: &Position) -> Vec<Position> {
        if !self.contains(*pos) {
            return Vec::new();
        }
        let mut neighbors = Vec::with_capacity(8);
        let (row, col) = (pos.row as isize, pos.col as isize);

        for (d_row, d_col) in &NEIGHBOR_OFFSETS {
            let n_row = row + d_row;
            let n_col = col + d_col;

            if n_row >= 0 && n_row < self.size as isize && n_col >= 0 && n_col < self.size as isize
            {
                let next_pos = Position::new(n_row as usize, n_col as usize);
                if !self.blocked[self.index(next_pos)] {
                    neighbors.push(next_pos);
                }
            }
        }
        neighbors
    }

    /// Iterates over every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Position::new(row, col)))
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        pos.row * self.size + pos.col
    }
}
