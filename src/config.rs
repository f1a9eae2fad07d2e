use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::algorithms::cost::Heuristic;
use crate::error::{Error, Result};
use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmChoice {
    /// Step-wise A* with live visualization.
    #[value(name = "a_star")]
    AStar,
    /// A* from the `pathfinding` crate.
    Reference,
    /// Both, on the same environment, with a comparison table.
    All,
}

impl std::fmt::Display for AlgorithmChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AlgorithmChoice::AStar => "a_star",
            AlgorithmChoice::Reference => "reference",
            AlgorithmChoice::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "A* shortest paths on obstacle grids", long_about = None)]
pub struct Config {
    #[arg(long, default_value_t = 30)]
    pub grid_size: usize,

    /// Pixel size of one cell, for front ends that map clicks to cells.
    #[arg(long, default_value_t = 20)]
    pub cell_size: u32,

    #[arg(long, default_value_t = 120)]
    pub num_walls: usize,

    /// Seed for wall and endpoint placement; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Text layout to load instead of random walls.
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Start cell as `row,col`.
    #[arg(long, value_parser = parse_position)]
    pub start: Option<Position>,

    /// Goal cell as `row,col`.
    #[arg(long, value_parser = parse_position)]
    pub goal: Option<Position>,

    #[arg(long, value_enum, default_value_t = AlgorithmChoice::AStar)]
    pub algorithm: AlgorithmChoice,

    #[arg(long, value_enum, default_value_t = Heuristic::Manhattan)]
    pub heuristic: Heuristic,

    #[arg(long, default_value_t = 30)]
    pub delay_ms: u64,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,

    /// Cancel the search after this many expansions.
    #[arg(long)]
    pub max_steps: Option<usize>,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 10)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = 0)]
    pub min_walls: usize,

    #[arg(long, default_value_t = 300)]
    pub max_walls: usize,

    #[arg(long, default_value_t = 50)]
    pub wall_step: usize,

    #[arg(long, default_value = "batch_results.csv")]
    pub output_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config::parse_from(["grid_astar"])
    }
}

impl Config {
    /// Checks cross-field constraints clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(Error::Config("--cell-size must be positive".to_string()));
        }
        // Batch runs always generate their own environments.
        if self.map.is_none() || self.batch_mode {
            if self.grid_size < 2 {
                return Err(Error::Config(
                    "--grid-size must be at least 2 to hold a start and a goal".to_string(),
                ));
            }
            for (flag, pos) in [("--start", self.start), ("--goal", self.goal)] {
                if let Some(pos) = pos {
                    if pos.row >= self.grid_size || pos.col >= self.grid_size {
                        return Err(Error::Config(format!(
                            "{} {} is outside a {}x{} grid",
                            flag, pos, self.grid_size, self.grid_size
                        )));
                    }
                }
            }
        }
        if self.batch_mode {
            if self.min_walls > self.max_walls {
                return Err(Error::Config(
                    "--min-walls must not exceed --max-walls".to_string(),
                ));
            }
            if self.wall_step == 0 || self.num_simulations == 0 {
                return Err(Error::Config(
                    "--wall-step and --num-simulations must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn visualize(&self) -> bool {
        !self.no_visualization && !self.batch_mode && !self.quiet
    }
}

fn parse_position(s: &str) -> std::result::Result<Position, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{}`", s))?;
    let row = row
        .trim()
        .parse()
        .map_err(|e| format!("bad row `{}`: {}", row, e))?;
    let col = col
        .trim()
        .parse()
        .map_err(|e| format!("bad column `{}`: {}", col, e))?;
    Ok(Position::new(row, col))
}
