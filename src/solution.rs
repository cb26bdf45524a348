//! Routes and route sets produced by the route builders.

use crate::instance::{GraphElement, Instance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ids of the elements already assigned to a route
pub type ServicedSet = HashSet<usize>;

/// One vehicle trip from the depot and back, servicing elements in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Serviced element ids, in service order
    pub elements: Vec<usize>,
    /// Sum of the costs of the serviced elements
    pub total_cost: u64,
    /// Sum of the demands of the serviced elements
    pub total_demand: u64,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `element` fits in the remaining capacity
    pub fn fits(&self, element: &GraphElement, capacity: u32) -> bool {
        self.total_demand + element.demand() as u64 <= capacity as u64
    }

    pub fn push(&mut self, element: &GraphElement) {
        self.elements.push(element.id());
        self.total_cost += element.cost() as u64;
        self.total_demand += element.demand() as u64;
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Result of a route builder run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub routes: Vec<Route>,
    /// Serviced ids, including those already serviced before the run
    pub serviced: ServicedSet,
    /// Required element ids no route could take, in file order
    pub unserviced: Vec<usize>,
    /// Builder that produced the routes
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
}

impl Solution {
    pub fn new(algorithm: &str) -> Self {
        Solution {
            routes: Vec::new(),
            serviced: ServicedSet::new(),
            unserviced: Vec::new(),
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
        }
    }

    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    pub fn total_cost(&self) -> u64 {
        self.routes.iter().map(|r| r.total_cost).sum()
    }

    pub fn total_demand(&self) -> u64 {
        self.routes.iter().map(|r| r.total_demand).sum()
    }

    /// Every required element ended up in some route
    pub fn is_complete(&self) -> bool {
        self.unserviced.is_empty()
    }

    /// Check that no route exceeds `capacity` and no element is serviced twice
    pub fn is_feasible(&self, capacity: u32) -> bool {
        let mut seen = HashSet::new();
        self.routes.iter().all(|r| {
            r.total_demand <= capacity as u64 && r.elements.iter().all(|&id| seen.insert(id))
        })
    }

    /// Recompute `unserviced` from the serviced set
    pub fn update_unserviced(&mut self, instance: &Instance) {
        self.unserviced = instance
            .required_elements()
            .map(GraphElement::id)
            .filter(|id| !self.serviced.contains(id))
            .collect();
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solution ({})", self.algorithm)?;
        writeln!(f, "  Routes: {}", self.num_routes())?;
        writeln!(f, "  Total cost: {}", self.total_cost())?;
        writeln!(f, "  Total demand: {}", self.total_demand())?;
        writeln!(f, "  Unserviced: {}", self.unserviced.len())?;
        writeln!(f, "  Time: {:.4}s", self.computation_time)
    }
}
