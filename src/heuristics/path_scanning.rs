//! Path-scanning route construction.
//!
//! Routes are built one at a time. Each pass sorts the remaining required
//! elements by cost and packs every one that still fits into a fresh route.

use crate::heuristics::RouteBuilder;
use crate::instance::{GraphElement, Instance};
use crate::solution::{Route, ServicedSet, Solution};

/// Greedy path-scanning heuristic
///
/// Deterministic: candidates are ordered by ascending cost with ties kept in
/// file order, and a route takes every candidate whose demand still fits.
#[derive(Debug, Clone, Default)]
pub struct PathScanning {
    /// Route capacity to use instead of the instance capacity
    pub capacity: Option<u32>,
}

impl PathScanning {
    pub fn new() -> Self {
        PathScanning { capacity: None }
    }

    pub fn with_capacity(capacity: u32) -> Self {
        PathScanning { capacity: Some(capacity) }
    }

    fn capacity(&self, instance: &Instance) -> u32 {
        self.capacity.unwrap_or(instance.capacity)
    }

    /// Required elements not yet serviced, cheapest first
    fn candidates<'a>(&self, instance: &'a Instance, serviced: &ServicedSet) -> Vec<&'a GraphElement> {
        let mut pending: Vec<&GraphElement> = instance
            .required_elements()
            .filter(|e| !serviced.contains(&e.id()))
            .collect();
        // stable: equal costs keep file order
        pending.sort_by_key(|e| e.cost());
        pending
    }

    /// Pack one route from the sorted candidates, marking what it takes
    fn scan(&self, candidates: &[&GraphElement], capacity: u32, serviced: &mut ServicedSet) -> Route {
        let mut route = Route::new();
        for &element in candidates {
            if serviced.contains(&element.id()) || !route.fits(element, capacity) {
                continue;
            }
            route.push(element);
            serviced.insert(element.id());
        }
        route
    }
}

impl RouteBuilder for PathScanning {
    fn build(&self, instance: &Instance, mut serviced: ServicedSet) -> Solution {
        let start = std::time::Instant::now();
        let capacity = self.capacity(instance);
        let mut routes = Vec::new();

        loop {
            let candidates = self.candidates(instance, &serviced);
            if candidates.is_empty() {
                break;
            }

            let route = self.scan(&candidates, capacity, &mut serviced);
            if route.is_empty() {
                // every remaining demand exceeds the capacity of an empty route
                break;
            }

            log::debug!(
                "Route {}: {} element(s), cost {}, demand {}/{}",
                routes.len() + 1,
                route.len(),
                route.total_cost,
                route.total_demand,
                capacity
            );
            routes.push(route);
        }

        let mut solution = Solution::new(self.name());
        solution.routes = routes;
        solution.serviced = serviced;
        solution.update_unserviced(instance);
        solution.computation_time = start.elapsed().as_secs_f64();
        solution
    }

    fn name(&self) -> &str {
        "PathScanning"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{LinkService, NodeService};

    const SAMPLE: &str = include_str!("../../data/sample.dat");

    fn create_test_instance(capacity: u32, services: &[(u32, u32)]) -> Instance {
        let elements = services
            .iter()
            .enumerate()
            .map(|(i, &(cost, demand))| {
                GraphElement::Link(LinkService {
                    id: i + 1,
                    from: i + 1,
                    to: i + 2,
                    traversal_cost: cost,
                    demand,
                    required: true,
                    directed: false,
                })
            })
            .collect();

        Instance {
            name: "test".to_string(),
            vertex_count: services.len() + 1,
            capacity,
            depot: 1,
            elements,
            ..Default::default()
        }
    }

    fn route_ids(solution: &Solution) -> Vec<Vec<usize>> {
        solution.routes.iter().map(|r| r.elements.clone()).collect()
    }

    #[test]
    fn test_worked_example() {
        // A(cost 2, demand 4), B(cost 1, demand 5), C(cost 3, demand 6)
        let instance = create_test_instance(10, &[(2, 4), (1, 5), (3, 6)]);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![2, 1], vec![3]]);
        assert_eq!(solution.routes[0].total_cost, 3);
        assert_eq!(solution.routes[0].total_demand, 9);
        assert_eq!(solution.routes[1].total_cost, 3);
        assert_eq!(solution.routes[1].total_demand, 6);
        assert_eq!(solution.num_routes(), 2);
        assert_eq!(solution.total_cost(), 6);
        assert_eq!(solution.total_demand(), 15);
        assert!(solution.is_complete());
    }

    #[test]
    fn test_equal_costs_keep_file_order() {
        let instance = create_test_instance(100, &[(5, 1), (3, 1), (5, 1), (3, 1)]);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![2, 4, 1, 3]]);
    }

    #[test]
    fn test_routes_respect_capacity() {
        let instance = Instance::parse(SAMPLE);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert!(solution.is_feasible(instance.capacity));
        for route in &solution.routes {
            assert!(route.total_demand <= instance.capacity as u64);
        }
        assert!(solution.is_complete());
        assert_eq!(solution.serviced.len(), instance.required_count());
    }

    #[test]
    fn test_sample_routes() {
        let instance = Instance::parse(SAMPLE);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![2, 8, 1, 3], vec![4, 7]]);
        assert_eq!(solution.total_cost(), 16);
        assert_eq!(solution.total_demand(), 19);
    }

    #[test]
    fn test_deterministic() {
        let instance = Instance::parse(SAMPLE);
        let builder = PathScanning::new();

        let first = builder.build(&instance, ServicedSet::new());
        let second = builder.build(&instance, ServicedSet::new());
        assert_eq!(first.routes, second.routes);
    }

    #[test]
    fn test_everything_already_serviced() {
        let instance = Instance::parse(SAMPLE);
        let builder = PathScanning::new();

        let first = builder.build(&instance, ServicedSet::new());
        let again = builder.build(&instance, first.serviced.clone());
        assert_eq!(again.num_routes(), 0);
        assert!(again.is_complete());
        assert_eq!(again.serviced, first.serviced);
    }

    #[test]
    fn test_partially_serviced_input() {
        let instance = create_test_instance(10, &[(2, 4), (1, 5), (3, 6)]);
        let serviced: ServicedSet = [2].into_iter().collect();
        let solution = PathScanning::new().build(&instance, serviced);

        assert_eq!(route_ids(&solution), vec![vec![1, 3]]);
        assert_eq!(solution.serviced.len(), 3);
    }

    #[test]
    fn test_oversized_demands_are_left_unserviced() {
        let instance = create_test_instance(5, &[(1, 3), (2, 9), (3, 2), (4, 6)]);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![1, 3]]);
        assert_eq!(solution.unserviced, vec![2, 4]);
        assert!(!solution.is_complete());
    }

    #[test]
    fn test_zero_capacity() {
        let instance = create_test_instance(0, &[(1, 3), (2, 1)]);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(solution.num_routes(), 0);
        assert_eq!(solution.unserviced, vec![1, 2]);
    }

    #[test]
    fn test_zero_demand_elements_fit_zero_capacity() {
        let instance = create_test_instance(0, &[(1, 0), (2, 1)]);
        let solution = PathScanning::new().build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![1]]);
        assert_eq!(solution.unserviced, vec![2]);
    }

    #[test]
    fn test_capacity_override() {
        let instance = create_test_instance(10, &[(2, 4), (1, 5), (3, 6)]);
        let solution = PathScanning::with_capacity(20).build(&instance, ServicedSet::new());

        assert_eq!(route_ids(&solution), vec![vec![2, 1, 3]]);
    }

    #[test]
    fn test_plain_links_are_never_serviced() {
        let mut instance = create_test_instance(10, &[(1, 1)]);
        instance.elements.push(GraphElement::Link(LinkService {
            id: 2,
            from: 1,
            to: 3,
            traversal_cost: 0,
            demand: 0,
            required: false,
            directed: true,
        }));
        instance.elements.push(GraphElement::Node(NodeService {
            id: 3,
            vertex: 3,
            service_cost: 4,
            demand: 2,
        }));

        let solution = PathScanning::new().build(&instance, ServicedSet::new());
        assert_eq!(route_ids(&solution), vec![vec![1, 3]]);
        assert!(!solution.serviced.contains(&2));
    }
}
