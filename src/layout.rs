//! Plain-text grid layouts.
//!
//! One line per row, one character per cell:
//!
//! ```text
//! S..#
//! .#.#
//! .#..
//! ...G
//! ```
//!
//! `.` is open, `#` blocked, `S` the start and `G` the goal. The layout must
//! be square. Blank lines are ignored, and so is trailing whitespace.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::grid::{Grid, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub grid: Grid,
    pub start: Option<Position>,
    pub goal: Option<Position>,
}

impl Layout {
    pub fn load(path: &std::path::Path) -> Result<Self> {
        std::fs::read_to_string(path)?.parse()
    }
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rows: Vec<(usize, &str)> = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim_end()))
            .filter(|(_, line)| !line.is_empty())
            .collect();

        let size = rows.len();
        let mut grid = Grid::new(size).map_err(|_| Error::Layout {
            line: 1,
            message: "layout is empty".to_string(),
        })?;
        let mut start = None;
        let mut goal = None;

        for (row, &(line_no, line)) in rows.iter().enumerate() {
            let width = line.chars().count();
            if width != size {
                return Err(Error::Layout {
                    line: line_no,
                    message: format!("expected {} cells, found {}", size, width),
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let pos = Position::new(row, col);
                match ch {
                    '.' => {}
                    '#' => grid.set_blocked(pos, true)?,
                    'S' | 'G' => {
                        let slot = if ch == 'S' { &mut start } else { &mut goal };
                        if slot.replace(pos).is_some() {
                            return Err(Error::Layout {
                                line: line_no,
                                message: format!("more than one '{}' marker", ch),
                            });
                        }
                    }
                    other => {
                        return Err(Error::Layout {
                            line: line_no,
                            message: format!("unexpected character {:?}", other),
                        })
                    }
                }
            }
        }

        Ok(Layout { grid, start, goal })
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.grid.size() {
            for col in 0..self.grid.size() {
                let pos = Position::new(row, col);
                let ch = if Some(pos) == self.start {
                    'S'
                } else if Some(pos) == self.goal {
                    'G'
                } else if self.grid.is_passable(pos) {
                    '.'
                } else {
                    '#'
                };
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
