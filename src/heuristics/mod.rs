//! Heuristics module for NEARP route construction.

pub mod path_scanning;

pub use path_scanning::*;

use crate::instance::Instance;
use crate::solution::{ServicedSet, Solution};

/// A constructive route builder.
///
/// `serviced` holds the ids already covered before the run; the returned
/// solution carries it back, extended with everything the new routes service.
pub trait RouteBuilder {
    fn build(&self, instance: &Instance, serviced: ServicedSet) -> Solution;
    fn name(&self) -> &str;
}
