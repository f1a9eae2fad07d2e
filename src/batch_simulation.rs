use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::simulation::{AlgorithmResult, Environment, Simulation};

const CSV_HEADER: &str = "simulation_id,seed,algorithm,grid_size,num_walls,outcome,path_cells,path_cost,expanded,discovered,elapsed_ns,matches_reference";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub simulation_id: usize,
    pub seed: u64,
    pub algorithm: String,
    pub grid_size: usize,
    pub num_walls: usize,
    pub outcome: String,
    pub path_cells: usize,
    pub path_cost: f64,
    pub expanded: usize,
    pub discovered: usize,
    pub elapsed_ns: u64,
    /// Same reachability and path cost as the reference solver.
    pub matches_reference: bool,
}

impl BatchResult {
    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{:.6},{},{},{},{}",
            self.simulation_id,
            self.seed,
            self.algorithm,
            self.grid_size,
            self.num_walls,
            self.outcome,
            self.path_cells,
            self.path_cost,
            self.expanded,
            self.discovered,
            self.elapsed_ns,
            self.matches_reference
        )
    }
}

/// Sweeps wall counts over many seeded environments, running every algorithm
/// on each one and appending rows to a CSV file.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    pending: Vec<BatchResult>,
    start_time: Instant,
    batch_size: usize,
    total_results_written: usize,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            pending: Vec::new(),
            start_time: Instant::now(),
            batch_size: 100,
            total_results_written: 0,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.results
    }

    pub fn run(&mut self) -> Result<()> {
        self.initialize_csv_file()?;
        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        let wall_counts: Vec<usize> = (self.config.min_walls..=self.config.max_walls)
            .step_by(self.config.wall_step)
            .collect();

        if !self.config.quiet {
            println!("=== BATCH SIMULATION STARTED ===");
            println!("Grid size: {}", self.config.grid_size);
            println!("Wall counts: {:?}", wall_counts);
            println!("Simulations per wall count: {}", self.config.num_simulations);
            println!("Heuristic: {:?}", self.config.heuristic);
            println!("Base seed: {}", base_seed);
            println!("Output file: {}", self.config.output_file);
            println!();
        }

        let mut simulation_id = 0;
        let mut last_progress_report = Instant::now();
        let progress_interval = Duration::from_secs(10);
        let total = wall_counts.len() * self.config.num_simulations;

        for &num_walls in &wall_counts {
            let mut run_config = self.config.clone();
            run_config.num_walls = num_walls;
            run_config.no_visualization = true;
            run_config.quiet = true;

            for _ in 0..self.config.num_simulations {
                let seed = base_seed.wrapping_add(simulation_id as u64);
                let environment = Environment::generate(&run_config, Some(seed))?;
                let simulation = Simulation::with_environment(run_config.clone(), environment);
                let results = simulation.run_all_algorithms()?;
                self.record(simulation_id, seed, num_walls, &results);
                simulation_id += 1;

                if self.pending.len() >= self.batch_size {
                    self.flush_results_to_csv()?;
                }

                if last_progress_report.elapsed() > progress_interval {
                    info!(
                        "Progress: {:.1}% ({}/{}) - Elapsed: {:.1}s",
                        simulation_id as f64 / total as f64 * 100.0,
                        simulation_id,
                        total,
                        self.start_time.elapsed().as_secs_f64()
                    );
                    last_progress_report = Instant::now();
                }
            }
        }

        self.flush_results_to_csv()?;

        if !self.config.quiet {
            println!("\n=== BATCH SIMULATION COMPLETED ===");
            println!("Total results collected: {}", self.results.len());
            println!("Results saved to: {}", self.config.output_file);
            println!("Total time: {:.2?}", self.start_time.elapsed());
        }
        Ok(())
    }

    fn record(&mut self, simulation_id: usize, seed: u64, num_walls: usize, results: &[AlgorithmResult]) {
        let reference = results.iter().find(|r| r.name == "reference");
        for result in results {
            let matches_reference = match reference {
                Some(reference) => match (&result.path, &reference.path) {
                    (Some(a), Some(b)) => (a.cost() - b.cost()).abs() < 1e-9,
                    (None, None) => true,
                    _ => false,
                },
                None => true,
            };
            let row = BatchResult {
                simulation_id,
                seed,
                algorithm: result.name.clone(),
                grid_size: self.config.grid_size,
                num_walls,
                outcome: result.outcome.to_string(),
                path_cells: result.statistics.path_cells,
                path_cost: result.statistics.path_cost,
                expanded: result.statistics.expanded,
                discovered: result.statistics.discovered,
                elapsed_ns: result.statistics.elapsed.as_nanos() as u64,
                matches_reference,
            };
            self.pending.push(row.clone());
            self.results.push(row);
        }
    }

    fn flush_results_to_csv(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.output_file)?;
        for result in &self.pending {
            writeln!(file, "{}", result.csv_row())?;
        }

        self.total_results_written += self.pending.len();
        debug!(
            "Flushed {} results to CSV (total: {})",
            self.pending.len(),
            self.total_results_written
        );
        self.pending.clear();
        Ok(())
    }

    fn initialize_csv_file(&self) -> Result<()> {
        let mut file = std::fs::File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        debug!("Initialized CSV file: {}", self.config.output_file);
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.results.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");

        let mut algorithm_groups: BTreeMap<&str, Vec<&BatchResult>> = BTreeMap::new();
        for result in &self.results {
            algorithm_groups
                .entry(result.algorithm.as_str())
                .or_default()
                .push(result);
        }

        for (algorithm, results) in algorithm_groups {
            println!("\n{} Algorithm Results:", algorithm);
            let total = results.len();
            let found: Vec<_> = results.iter().filter(|r| r.outcome == "found").collect();
            let agreeing = results.iter().filter(|r| r.matches_reference).count();

            println!(
                "  Paths found: {}/{} ({:.1}%)",
                found.len(),
                total,
                found.len() as f64 / total as f64 * 100.0
            );
            println!("  Agrees with reference: {}/{}", agreeing, total);

            if !found.is_empty() {
                let n = found.len() as f64;
                let avg_cost = found.iter().map(|r| r.path_cost).sum::<f64>() / n;
                let avg_expanded = found.iter().map(|r| r.expanded as f64).sum::<f64>() / n;
                let avg_time = found.iter().map(|r| r.elapsed_ns as f64).sum::<f64>() / n;
                println!("  Average path cost: {:.2}", avg_cost);
                println!("  Average expansions: {:.1}", avg_expanded);
                println!("  Average search time: {:.1}us", avg_time / 1000.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use clap::Parser;

    #[test]
    fn writes_header_and_one_row_per_algorithm_run() {
        let output = std::env::temp_dir().join(format!("grid_astar_batch_{}.csv", std::process::id()));
        let config = Config::parse_from([
            "grid_astar",
            "--batch-mode",
            "--quiet",
            "--grid-size",
            "8",
            "--min-walls",
            "0",
            "--max-walls",
            "10",
            "--wall-step",
            "5",
            "--num-simulations",
            "2",
            "--seed",
            "11",
            "--heuristic",
            "octile",
            "--output-file",
            output.to_str().unwrap(),
        ]);
        let mut batch = BatchSimulation::new(config).with_batch_size(4);
        batch.run().unwrap();

        // 3 wall counts x 2 simulations x 2 algorithms.
        assert_eq!(batch.results().len(), 12);
        for pair in batch.results().chunks(2) {
            let (a_star, reference) = (&pair[0], &pair[1]);
            assert_eq!(a_star.simulation_id, reference.simulation_id);
            assert_eq!(reference.algorithm, "reference");
            assert!(reference.matches_reference);
            // Same reachability; the reference is optimal under octile.
            assert_eq!(a_star.outcome, reference.outcome);
            assert!(a_star.path_cost >= reference.path_cost - 1e-9);
        }

        let csv = std::fs::read_to_string(&output).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        assert_eq!(lines.count(), 12);
        std::fs::remove_file(&output).unwrap();
    }

    #[test]
    fn batch_ignores_map_and_rejects_tiny_grids() {
        let output =
            std::env::temp_dir().join(format!("grid_astar_tiny_{}.csv", std::process::id()));
        let config = Config::parse_from([
            "grid_astar",
            "--batch-mode",
            "--quiet",
            "--map",
            "/nonexistent/maze.txt",
            "--grid-size",
            "1",
            "--output-file",
            output.to_str().unwrap(),
        ]);
        assert!(config.validate().is_err());

        let mut batch = BatchSimulation::new(config);
        assert!(matches!(batch.run(), Err(Error::Config(_))));
        assert!(batch.results().is_empty());
        let _ = std::fs::remove_file(&output);
    }
}
