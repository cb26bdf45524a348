//! Batch runs over directories of instances.
//!
//! Every instance is analyzed and solved with the path-scanning builder;
//! one record per instance is collected and can be exported to CSV or
//! summarized in a text report.

use crate::error::{Error, Result};
use crate::heuristics::{PathScanning, RouteBuilder};
use crate::instance::Instance;
use crate::report;
use crate::solution::{ServicedSet, Solution};
use crate::statistics::GraphStatistics;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Statistics and route summary for one instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceResult {
    /// Instance name
    pub instance: String,
    pub capacity: u32,
    pub vertices: usize,
    pub edges: usize,
    pub arcs: usize,
    pub required_vertices: usize,
    pub required_edges: usize,
    pub required_arcs: usize,
    pub density: f64,
    pub components: usize,
    pub min_degree: usize,
    pub max_degree: usize,
    /// Number of routes built
    pub routes: usize,
    pub total_cost: u64,
    pub total_demand: u64,
    /// Required elements left without a route
    pub unserviced: usize,
    /// Best known objective, when the file provides one
    pub optimal_value: Option<i64>,
    /// Computation time in seconds
    pub time: f64,
}

impl InstanceResult {
    pub fn new(instance: &Instance, stats: &GraphStatistics, solution: &Solution) -> Self {
        InstanceResult {
            instance: instance.name.clone(),
            capacity: instance.capacity,
            vertices: stats.vertices,
            edges: stats.edges,
            arcs: stats.arcs,
            required_vertices: stats.required_vertices,
            required_edges: stats.required_edges,
            required_arcs: stats.required_arcs,
            density: stats.density,
            components: stats.components,
            min_degree: stats.min_degree,
            max_degree: stats.max_degree,
            routes: solution.num_routes(),
            total_cost: solution.total_cost(),
            total_demand: solution.total_demand(),
            unserviced: solution.unserviced.len(),
            optimal_value: instance.optimal_value.filter(|&v| v >= 0),
            time: solution.computation_time,
        }
    }
}

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Process instances in parallel
    pub parallel: bool,
    /// Write a `sol-<name>.dat` route file per instance into `output_dir`
    pub write_solutions: bool,
    /// Show a progress bar on stderr
    pub show_progress: bool,
    /// Output directory
    pub output_dir: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            parallel: true,
            write_solutions: false,
            show_progress: true,
            output_dir: "results".to_string(),
        }
    }
}

/// Batch engine
pub struct Benchmark {
    config: BatchConfig,
    results: Vec<InstanceResult>,
}

impl Benchmark {
    pub fn new(config: BatchConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Analyze and solve a single instance, writing its route file when configured
    pub fn run_instance(&self, instance: &Instance) -> Result<InstanceResult> {
        let stats = GraphStatistics::compute(instance);
        let solution = PathScanning::new().build(instance, ServicedSet::new());

        if !solution.is_complete() {
            log::warn!(
                "{}: {} required element(s) exceed capacity {} and were left unserviced",
                instance.name,
                solution.unserviced.len(),
                instance.capacity
            );
        }

        if self.config.write_solutions {
            let path = Path::new(&self.config.output_dir).join(solution_file_name(instance));
            report::save_routes(&path, instance, &solution)?;
        }

        Ok(InstanceResult::new(instance, &stats, &solution))
    }

    /// Run on every instance, in parallel when configured
    pub fn run_on_instances(&mut self, instances: &[Instance]) -> Result<()> {
        let progress = self.progress_bar(instances.len() as u64);

        let run = |instance: &Instance| {
            let result = self.run_instance(instance);
            progress.inc(1);
            result
        };

        let results: Result<Vec<InstanceResult>> = if self.config.parallel {
            instances.par_iter().map(run).collect()
        } else {
            instances.iter().map(run).collect()
        };

        progress.finish_and_clear();
        self.results.extend(results?);
        Ok(())
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} instances ({elapsed})") {
            bar.set_style(style.progress_chars("##-"));
        }
        bar
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::write(path, e))?;
        let mut writer = csv::Writer::from_writer(file);

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush().map_err(|e| Error::write(path, e))?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("       NEARP Batch Report\n");
        report.push_str("========================================\n");
        report.push_str(&format!("Generated: {}\n\n", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")));

        report.push_str("-".repeat(96).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<28} {:>6} {:>6} {:>8} {:>7} {:>10} {:>10} {:>10} {:>8}\n",
            "Instance", "|V|", "Comp.", "Density", "Routes", "Cost", "Demand", "Unserved", "Time"
        ));
        report.push_str("-".repeat(96).as_str());
        report.push('\n');

        for r in &self.results {
            report.push_str(&format!(
                "{:<28} {:>6} {:>6} {:>8.4} {:>7} {:>10} {:>10} {:>10} {:>8.4}\n",
                r.instance, r.vertices, r.components, r.density, r.routes, r.total_cost, r.total_demand, r.unserviced, r.time
            ));
        }

        report.push_str("-".repeat(96).as_str());
        report.push('\n');

        let total_routes: usize = self.results.iter().map(|r| r.routes).sum();
        let total_cost: u64 = self.results.iter().map(|r| r.total_cost).sum();
        let incomplete = self.results.iter().filter(|r| r.unserviced > 0).count();

        report.push_str(&format!("\nInstances: {}\n", self.results.len()));
        report.push_str(&format!("Routes built: {}\n", total_routes));
        report.push_str(&format!("Total cost: {}\n", total_cost));
        report.push_str(&format!("Instances with unserviced elements: {}\n", incomplete));

        report
    }

    /// Get all results
    pub fn results(&self) -> &[InstanceResult] {
        &self.results
    }
}

/// `sol-<instance file name>`; instances built in memory fall back to their
/// name with path separators replaced.
fn solution_file_name(instance: &Instance) -> String {
    match instance.source.as_deref().and_then(Path::file_name) {
        Some(file_name) => format!("sol-{}", file_name.to_string_lossy()),
        None => format!("sol-{}.dat", instance.name.replace(['/', '\\'], "_")),
    }
}

/// Instance files (`*.dat`, excluding `sol-*` result files) of a directory, sorted by name
pub fn instance_files<P: AsRef<Path>>(dir: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "dat").unwrap_or(false))
            .filter(|path| {
                path.file_name()
                    .map(|n| !n.to_string_lossy().starts_with("sol-"))
                    .unwrap_or(false)
            })
            .collect(),
        Err(e) => {
            log::error!("Cannot read directory: {}", e);
            Vec::new()
        }
    };
    files.sort();
    files
}

/// Helper function to load instances from a directory; unreadable files are skipped
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Vec<Instance> {
    instance_files(dir)
        .into_iter()
        .filter_map(|path| match Instance::from_file(&path) {
            Ok(instance) => Some(instance),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect()
}
