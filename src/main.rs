//! NEARP Solver - Command Line Interface
//!
//! Graph statistics and path-scanning routes for NEARP/CARP instances.

use clap::{Parser, Subcommand};
use nearp_solver::benchmark::{load_instances_from_dir, BatchConfig, Benchmark};
use nearp_solver::heuristics::{PathScanning, RouteBuilder};
use nearp_solver::instance::Instance;
use nearp_solver::report;
use nearp_solver::solution::ServicedSet;
use nearp_solver::statistics::{GraphStatistics, PathStatistics};
use nearp_solver::Result;

use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nearp-solver")]
#[command(version = "1.0")]
#[command(about = "Graph statistics and path-scanning routes for NEARP instances")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build capacity-feasible routes covering the required elements
    Solve {
        #[arg(short, long)]
        instance: PathBuf,

        /// Route file (default: sol-<instance file> next to the instance)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the solution as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Vehicle capacity to use instead of the instance value
        #[arg(long)]
        capacity: Option<u32>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print graph statistics of an instance
    Analyze {
        /// Path to the instance file
        #[arg(short, long)]
        instance: PathBuf,

        /// Add the shortest-path summary (diameter, average path length)
        #[arg(long)]
        extended: bool,

        /// Also write the statistics as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Analyze and solve every instance of a directory
    Batch {
        /// Directory containing instance files
        #[arg(short, long)]
        dir: PathBuf,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Write a route file per instance into the output directory
        #[arg(long)]
        solutions: bool,

        /// Process instances one at a time
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Serialize)]
struct AnalysisReport<'a> {
    instance: &'a str,
    statistics: GraphStatistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    paths: Option<PathStatistics>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Solve { instance, output, json, capacity, verbose } => {
            solve_instance(&instance, output, json, capacity, verbose)
        }

        Commands::Analyze { instance, extended, json } => {
            analyze_instance(&instance, extended, json)
        }

        Commands::Batch { dir, output, solutions, sequential } => {
            run_batch(&dir, &output, solutions, sequential)
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_instance(
    path: &Path,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    capacity: Option<u32>,
    verbose: bool,
) -> Result<()> {
    let instance = Instance::from_file(path)?;

    let builder = match capacity {
        Some(c) => PathScanning::with_capacity(c),
        None => PathScanning::new(),
    };
    let capacity = capacity.unwrap_or(instance.capacity);

    log::info!("Building routes with {} (capacity {})", builder.name(), capacity);
    let solution = builder.build(&instance, ServicedSet::new());

    for &id in &solution.unserviced {
        if let Some(element) = instance.element(id) {
            log::warn!(
                "Element {} ({:?} {:?}) has demand {} above capacity {} and was not serviced",
                id,
                element.kind(),
                element.endpoints(),
                element.demand(),
                capacity
            );
        }
    }

    let out_path = output.unwrap_or_else(|| report::default_solution_path(path));
    report::save_routes(&out_path, &instance, &solution)?;

    print!("{}", report::format_routes(&instance, &solution));

    if verbose {
        println!("\n{}", solution);
        println!("Solution saved to {:?}", out_path);
    }

    if let Some(json_path) = json {
        report::save_json(&json_path, &solution)?;
    }

    Ok(())
}

fn analyze_instance(path: &Path, extended: bool, json: Option<PathBuf>) -> Result<()> {
    let instance = Instance::from_file(path)?;

    let statistics = GraphStatistics::compute(&instance);
    print!("{}", statistics);

    let paths = extended.then(|| PathStatistics::compute(&instance));
    if let Some(paths) = &paths {
        println!();
        print!("{}", paths);
    }

    if let Some(json_path) = json {
        let analysis = AnalysisReport {
            instance: &instance.name,
            statistics,
            paths,
        };
        report::save_json(&json_path, &analysis)?;
    }

    Ok(())
}

fn run_batch(dir: &Path, output: &Path, solutions: bool, sequential: bool) -> Result<()> {
    println!("Loading instances from {:?}...", dir);

    let instances = load_instances_from_dir(dir);

    println!("Found {} instances", instances.len());

    if instances.is_empty() {
        eprintln!("No instances found!");
        return Ok(());
    }

    std::fs::create_dir_all(output).map_err(|e| nearp_solver::Error::write(output, e))?;

    let config = BatchConfig {
        parallel: !sequential,
        write_solutions: solutions,
        output_dir: output.to_string_lossy().to_string(),
        ..Default::default()
    };

    let mut benchmark = Benchmark::new(config);
    benchmark.run_on_instances(&instances)?;

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report).map_err(|e| nearp_solver::Error::write(&report_path, e))?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}
