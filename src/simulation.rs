use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

use crate::algorithms::a_star::{AStar, Step};
use crate::algorithms::common::PathfindingAlgorithm;
use crate::algorithms::path::Path;
use crate::algorithms::reference::ReferenceAStar;
use crate::config::{AlgorithmChoice, Config};
use crate::error::{Error, Result};
use crate::grid::{Grid, Position};
use crate::layout::Layout;
use crate::render::TerminalRenderer;
use crate::session::Session;
use crate::statistics::SearchStatistics;

/// Grid and endpoints shared by every algorithm in one run.
#[derive(Debug, Clone)]
pub struct Environment {
    pub grid: Grid,
    pub start: Position,
    pub goal: Position,
    pub seed: Option<u64>,
}

impl Environment {
    /// Loads `--map` when given, otherwise generates random walls.
    pub fn from_config(config: &Config) -> Result<Self> {
        match &config.map {
            Some(path) => {
                let layout = Layout::load(path)?;
                let start = config.start.or(layout.start).ok_or_else(|| {
                    Error::Config("map has no 'S' marker and --start is not set".to_string())
                })?;
                let goal = config.goal.or(layout.goal).ok_or_else(|| {
                    Error::Config("map has no 'G' marker and --goal is not set".to_string())
                })?;
                info!(
                    "Loaded {}x{} map from {:?} with {} walls",
                    layout.grid.size(),
                    layout.grid.size(),
                    path,
                    layout.grid.blocked_count()
                );
                Ok(Environment {
                    grid: layout.grid,
                    start,
                    goal,
                    seed: None,
                })
            }
            None => Self::generate(config, config.seed),
        }
    }

    /// Random walls; the start defaults to the top-left quadrant and the goal
    /// to the bottom-right one. Endpoints are never walled.
    pub fn generate(config: &Config, seed: Option<u64>) -> Result<Self> {
        let size = config.grid_size;
        if size < 2 {
            return Err(Error::Config(format!(
                "cannot place a start and a goal on a {}x{} grid",
                size, size
            )));
        }
        let seed = seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let start = config.start.unwrap_or_else(|| {
            Position::new(rng.gen_range(0..size / 2), rng.gen_range(0..size / 2))
        });
        let goal = config.goal.unwrap_or_else(|| {
            Position::new(rng.gen_range(size / 2..size), rng.gen_range(size / 2..size))
        });

        let grid = Grid::with_random_walls(size, config.num_walls, &[start, goal], &mut rng)?;
        info!(
            "Generated environment - Start: {}, Goal: {}, Walls: {}, Seed: {}",
            start,
            goal,
            grid.blocked_count(),
            seed
        );

        Ok(Environment {
            grid,
            start,
            goal,
            seed: Some(seed),
        })
    }
}

/// How a search ended, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Found,
    Exhausted,
    Cancelled,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Outcome::Found => "found",
            Outcome::Exhausted => "no path",
            Outcome::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct AlgorithmResult {
    pub name: String,
    pub outcome: Outcome,
    pub path: Option<Path>,
    pub statistics: SearchStatistics,
}

impl AlgorithmResult {
    /// Splits a search result into a reportable outcome. Errors other than
    /// exhaustion or cancellation are passed through.
    fn from_search(name: &str, result: Result<Path>, statistics: SearchStatistics) -> Result<Self> {
        let (outcome, path) = match result {
            Ok(path) => (Outcome::Found, Some(path)),
            Err(e) if !e.is_search_failure() => return Err(e),
            Err(Error::Cancelled) => (Outcome::Cancelled, None),
            Err(_) => (Outcome::Exhausted, None),
        };
        Ok(AlgorithmResult {
            name: name.to_string(),
            outcome,
            path,
            statistics,
        })
    }

    pub fn success(&self) -> bool {
        self.outcome == Outcome::Found
    }
}

pub struct Simulation {
    config: Config,
    environment: Environment,
}

impl Simulation {
    pub fn new(config: Config) -> Result<Self> {
        let environment = Environment::from_config(&config)?;
        Ok(Self::with_environment(config, environment))
    }

    pub fn with_environment(config: Config, environment: Environment) -> Self {
        Simulation {
            config,
            environment,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Runs the configured algorithm (`All` runs the step-wise A*).
    pub fn run(&self) -> Result<AlgorithmResult> {
        match self.config.algorithm {
            AlgorithmChoice::Reference => {
                let mut reference = ReferenceAStar::with_heuristic(self.config.heuristic);
                self.run_algorithm(&mut reference)
            }
            AlgorithmChoice::AStar | AlgorithmChoice::All => self.run_stepwise(),
        }
    }

    /// Drives the engine one expansion at a time, redrawing between steps
    /// and cancelling once the step budget runs out.
    pub fn run_stepwise(&self) -> Result<AlgorithmResult> {
        let env = &self.environment;
        let mut session = Session::from_grid(
            env.grid.clone(),
            self.config.cell_size,
            Some(env.start),
            Some(env.goal),
        )?
        .with_heuristic(self.config.heuristic);
        session.lock();

        let mut renderer = TerminalRenderer::new(env.grid.size());
        let mut engine = session.engine()?;
        let mut steps = 0;
        let visualize = self.config.visualize();

        let result = loop {
            if self.config.max_steps.is_some_and(|max| steps >= max) {
                warn!("Step budget of {} exhausted, cancelling search", steps);
                engine.cancel();
            }
            match engine.step(&mut renderer) {
                Step::Expanded(pos) => {
                    steps += 1;
                    if visualize {
                        TerminalRenderer::clear_screen();
                        println!("=== A* SEARCH ===");
                        println!(
                            "Step: {} | Expanded: {} | Frontier: {}",
                            steps,
                            pos,
                            engine.frontier_len()
                        );
                        print!(
                            "{}",
                            renderer.frame(session.grid(), session.start(), session.goal())
                        );
                        thread::sleep(Duration::from_millis(self.config.delay_ms));
                    }
                }
                Step::Succeeded(path) => break Ok(path),
                Step::Exhausted => break Err(Error::Exhausted),
                Step::Cancelled => break Err(Error::Cancelled),
            }
        };

        if visualize {
            TerminalRenderer::clear_screen();
            println!("=== SEARCH COMPLETE ===");
            print!(
                "{}",
                renderer.frame(session.grid(), session.start(), session.goal())
            );
        }

        let statistics = engine.statistics().clone();
        AlgorithmResult::from_search("a_star", result, statistics)
    }

    fn run_algorithm(&self, algorithm: &mut dyn PathfindingAlgorithm) -> Result<AlgorithmResult> {
        let env = &self.environment;
        let result = algorithm.find_path(&env.grid, env.start, env.goal);
        AlgorithmResult::from_search(algorithm.name(), result, algorithm.statistics())
    }

    /// Runs both algorithms on one environment.
    pub fn run_all_algorithms(&self) -> Result<Vec<AlgorithmResult>> {
        let mut algorithms: Vec<Box<dyn PathfindingAlgorithm>> = vec![
            Box::new(AStar::with_heuristic(self.config.heuristic)),
            Box::new(ReferenceAStar::with_heuristic(self.config.heuristic)),
        ];

        let mut results = Vec::new();
        for algorithm in algorithms.iter_mut() {
            info!("Running {}", algorithm.name());
            results.push(self.run_algorithm(algorithm.as_mut())?);
        }
        Ok(results)
    }

    /// Print comparison results in a table.
    pub fn print_comparison_results(results: &[AlgorithmResult]) {
        println!("\n=== ALGORITHM COMPARISON RESULTS ===");
        println!();
        println!(
            "{:<12} {:<10} {:<8} {:<8} {:<10} {:<12} {:<12}",
            "Algorithm", "Outcome", "Cells", "Cost", "Expanded", "Discovered", "Time"
        );
        println!("{}", "-".repeat(76));

        for result in results {
            let stats = &result.statistics;
            let (cells, cost) = match &result.path {
                Some(path) => (path.len().to_string(), format!("{:.1}", path.cost())),
                None => ("-".to_string(), "-".to_string()),
            };
            println!(
                "{:<12} {:<10} {:<8} {:<8} {:<10} {:<12} {:<12}",
                result.name,
                result.outcome.to_string(),
                cells,
                cost,
                stats.expanded,
                stats.discovered,
                format!("{:.2?}", stats.elapsed)
            );
        }

        let costs: Vec<f64> = results
            .iter()
            .filter_map(|r| r.path.as_ref().map(Path::cost))
            .collect();
        println!();
        if costs.len() == results.len() && costs.len() > 1 {
            let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
            let max = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max - min < 1e-9 {
                println!("All algorithms agree on a path cost of {:.1}", min);
            } else {
                println!("Path costs differ: {:.1} to {:.1}", min, max);
            }
        } else if costs.is_empty() {
            println!("No algorithm reached the goal.");
        } else {
            println!("Algorithms disagree on whether the goal is reachable.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn quiet_config(args: &[&str]) -> Config {
        let mut full = vec!["grid_astar", "--no-visualization", "--quiet"];
        full.extend_from_slice(args);
        Config::parse_from(full)
    }

    #[test]
    fn seeded_environments_are_reproducible() {
        let config = quiet_config(&["--grid-size", "12", "--num-walls", "30"]);
        let a = Environment::generate(&config, Some(42)).unwrap();
        let b = Environment::generate(&config, Some(42)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!((a.start, a.goal), (b.start, b.goal));
        assert!(a.start.row < 6 && a.start.col < 6);
        assert!(a.goal.row >= 6 && a.goal.col >= 6);
        assert!(a.grid.is_passable(a.start) && a.grid.is_passable(a.goal));
    }

    #[test]
    fn stepwise_run_matches_provider() {
        let config = quiet_config(&["--grid-size", "15", "--num-walls", "40", "--seed", "3"]);
        let simulation = Simulation::new(config).unwrap();
        let stepwise = simulation.run().unwrap();

        let env = simulation.environment();
        let mut a_star = AStar::new();
        let direct = a_star.find_path(&env.grid, env.start, env.goal);
        match (stepwise.path, direct) {
            (Some(a), Ok(b)) => assert_eq!(a, b),
            (None, Err(Error::Exhausted)) => assert_eq!(stepwise.outcome, Outcome::Exhausted),
            (a, b) => panic!("mismatch: {:?} vs {:?}", a, b),
        }
    }

    #[test]
    fn step_budget_cancels() {
        let config = quiet_config(&[
            "--grid-size",
            "20",
            "--num-walls",
            "0",
            "--start",
            "0,0",
            "--goal",
            "19,19",
            "--max-steps",
            "5",
        ]);
        let result = Simulation::new(config).unwrap().run().unwrap();
        assert_eq!(result.outcome, Outcome::Cancelled);
        assert_eq!(result.statistics.expanded, 5);
        assert!(result.path.is_none());
    }

    #[test]
    fn comparison_runs_both_algorithms() {
        let config = quiet_config(&[
            "--grid-size",
            "10",
            "--num-walls",
            "0",
            "--start",
            "0,0",
            "--goal",
            "9,4",
        ]);
        let results = Simulation::new(config).unwrap().run_all_algorithms().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "a_star");
        assert_eq!(results[1].name, "reference");
        for result in &results {
            let path = result.path.as_ref().unwrap();
            assert_eq!(path.steps(), 9);
            assert!((path.cost() - (4.0 * 1.4 + 5.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn tiny_grids_are_rejected_before_sampling() {
        let config = quiet_config(&["--grid-size", "1", "--num-walls", "0"]);
        assert!(matches!(
            Environment::generate(&config, Some(1)),
            Err(Error::Config(_))
        ));
        assert!(matches!(Simulation::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn invalid_endpoints_surface_as_errors() {
        let config = quiet_config(&["--grid-size", "4", "--start", "1,1", "--goal", "1,1"]);
        let simulation = Simulation::new(config).unwrap();
        assert!(matches!(simulation.run(), Err(Error::InvalidEndpoints(_))));
    }
}
