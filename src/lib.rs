//! NEARP Solver Library
//!
//! Graph statistics and greedy route construction for mixed node/edge/arc
//! routing instances (NEARP / CARP benchmark files).
//!
//! # Features
//!
//! - Tolerant, section-driven parser for the NEARP text format
//! - Graph statistics: density, connected components, degree bounds,
//!   shortest-path diameter
//! - Path-scanning route construction under a vehicle capacity
//! - Route listings in the benchmark solution format, JSON and CSV exports
//!
//! # Example
//!
//! ```no_run
//! use nearp_solver::instance::Instance;
//! use nearp_solver::heuristics::{PathScanning, RouteBuilder};
//! use nearp_solver::solution::ServicedSet;
//! use nearp_solver::statistics::GraphStatistics;
//!
//! // Load instance
//! let instance = Instance::from_file("mggdb_0.25_10.dat").unwrap();
//!
//! // Graph statistics
//! println!("{}", GraphStatistics::compute(&instance));
//!
//! // Build routes
//! let solution = PathScanning::new().build(&instance, ServicedSet::new());
//!
//! println!("Routes: {}, cost: {}", solution.num_routes(), solution.total_cost());
//! ```

pub mod error;
pub mod instance;
pub mod parser;
pub mod statistics;
pub mod solution;
pub mod heuristics;
pub mod report;
pub mod benchmark;

pub use error::{Error, Result};
pub use instance::Instance;
pub use solution::Solution;
