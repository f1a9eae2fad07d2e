use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use grid_astar::batch_simulation::BatchSimulation;
use grid_astar::config::{AlgorithmChoice, Config};
use grid_astar::simulation::Simulation;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("grid_astar=info")),
        )
        .init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    info!(
        "Grid size: {}x{}, walls: {}, algorithm: {}, heuristic: {:?}",
        config.grid_size, config.grid_size, config.num_walls, config.algorithm, config.heuristic
    );

    if config.batch_mode {
        let mut batch_sim = BatchSimulation::new(config.clone());
        match batch_sim.run() {
            Ok(()) => {
                if !config.quiet {
                    batch_sim.print_summary();
                }
            }
            Err(e) => {
                error!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let simulation = match Simulation::new(config.clone()) {
        Ok(simulation) => simulation,
        Err(e) => {
            error!("Failed to set up the environment: {}", e);
            std::process::exit(1);
        }
    };

    if config.algorithm == AlgorithmChoice::All {
        match simulation.run_all_algorithms() {
            Ok(results) => Simulation::print_comparison_results(&results),
            Err(e) => {
                error!("Error running all algorithms: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    match simulation.run() {
        Ok(result) => {
            println!("\n=== FINAL RESULTS ===");
            println!("Algorithm: {}", result.name);
            println!("Outcome: {}", result.outcome);
            if let Some(path) = &result.path {
                if !config.quiet {
                    let cells: Vec<String> = path.cells().iter().map(|p| p.to_string()).collect();
                    println!("Path: {}", cells.join(" -> "));
                }
            }
            println!("{}", result.statistics);
            if !result.success() {
                std::process::exit(3);
            }
        }
        Err(e) => {
            error!("Search failed: {}", e);
            std::process::exit(1);
        }
    }
}
