//! Structural statistics of the instance graph.
//!
//! All computations are read-only over an [`Instance`]. Links are turned into
//! an adjacency view: origin to destination for every link, plus the reverse
//! direction for undirected links.

use crate::instance::{ElementKind, GraphElement, Instance};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Neighbour lists indexed by vertex id (index 0 unused)
#[derive(Debug, Clone)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Adjacency following link orientation: arcs only from origin to destination.
    pub fn directed(instance: &Instance) -> Self {
        Self::build(instance, false)
    }

    /// Reachability view where every link, arcs included, works both ways.
    pub fn undirected(instance: &Instance) -> Self {
        Self::build(instance, true)
    }

    fn build(instance: &Instance, symmetric: bool) -> Self {
        let mut neighbors = vec![Vec::new(); vertex_bound(instance) + 1];
        for link in instance.links() {
            neighbors[link.from].push(link.to);
            if symmetric || !link.directed {
                neighbors[link.to].push(link.from);
            }
        }
        Adjacency { neighbors }
    }

    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.neighbors.get(vertex).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether at least one link touches the vertex (in this view)
    pub fn has_links(&self, vertex: usize) -> bool {
        !self.neighbors(vertex).is_empty()
    }

    pub fn num_vertices(&self) -> usize {
        self.neighbors.len() - 1
    }
}

/// Largest vertex id in use, tolerating hand-built instances whose
/// `vertex_count` is smaller than the ids their links reference.
fn vertex_bound(instance: &Instance) -> usize {
    instance
        .links()
        .map(|l| l.from.max(l.to))
        .fold(instance.vertex_count, usize::max)
}

/// `2m / (n (n - 1))`, with every link counted once whatever its orientation.
///
/// Zero when the instance has fewer than two vertices.
pub fn density(instance: &Instance) -> f64 {
    let n = instance.vertex_count as f64;
    if instance.vertex_count < 2 {
        return 0.0;
    }
    let m = instance.links().count() as f64;
    (2.0 * m) / (n * (n - 1.0))
}

/// Number of connected components among vertices with at least one incident link.
///
/// Arc orientation is ignored. Isolated vertices are neither visited nor counted.
pub fn connected_components(instance: &Instance) -> usize {
    let adjacency = Adjacency::undirected(instance);
    let mut visited = vec![false; adjacency.num_vertices() + 1];
    let mut components = 0;

    for seed in 1..=adjacency.num_vertices() {
        if visited[seed] || !adjacency.has_links(seed) {
            continue;
        }

        components += 1;
        visited[seed] = true;
        let mut queue = VecDeque::from([seed]);
        while let Some(u) = queue.pop_front() {
            for &v in adjacency.neighbors(u) {
                if !visited[v] {
                    visited[v] = true;
                    queue.push_back(v);
                }
            }
        }
    }

    components
}

/// Minimum and maximum number of distinct neighbours over vertices with at least one.
///
/// Undirected links count for both endpoints, arcs only for their origin.
/// Returns `(0, 0)` when no vertex has a neighbour.
pub fn degree_bounds(instance: &Instance) -> (usize, usize) {
    let mut neighbor_sets: Vec<HashSet<usize>> = vec![HashSet::new(); vertex_bound(instance) + 1];
    for link in instance.links() {
        neighbor_sets[link.from].insert(link.to);
        if !link.directed {
            neighbor_sets[link.to].insert(link.from);
        }
    }

    let degrees = neighbor_sets.iter().map(HashSet::len).filter(|&d| d > 0);
    degrees.fold(None, |acc: Option<(usize, usize)>, d| match acc {
        None => Some((d, d)),
        Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
    })
    .unwrap_or((0, 0))
}

/// Distinct vertices that must be visited: endpoints of required links and
/// required node vertices.
pub fn required_vertices(instance: &Instance) -> usize {
    instance
        .required_elements()
        .flat_map(|e| {
            let (from, to) = e.endpoints();
            [from, to]
        })
        .collect::<HashSet<_>>()
        .len()
}

/// Fixed ten-field report about an instance graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStatistics {
    pub vertices: usize,
    /// Undirected links, required or not
    pub edges: usize,
    /// Directed links, required or not
    pub arcs: usize,
    pub required_vertices: usize,
    pub required_edges: usize,
    pub required_arcs: usize,
    pub density: f64,
    pub components: usize,
    pub min_degree: usize,
    pub max_degree: usize,
}

impl GraphStatistics {
    pub fn compute(instance: &Instance) -> Self {
        let (min_degree, max_degree) = degree_bounds(instance);

        GraphStatistics {
            vertices: instance.vertex_count,
            edges: instance.count_kind(ElementKind::Edge, false),
            arcs: instance.count_kind(ElementKind::Arc, false),
            required_vertices: required_vertices(instance),
            required_edges: instance.count_kind(ElementKind::Edge, true),
            required_arcs: instance.count_kind(ElementKind::Arc, true),
            density: density(instance),
            components: connected_components(instance),
            min_degree,
            max_degree,
        }
    }
}

impl std::fmt::Display for GraphStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "1. Vertices: {}", self.vertices)?;
        writeln!(f, "2. Edges (undirected): {}", self.edges)?;
        writeln!(f, "3. Arcs (directed): {}", self.arcs)?;
        writeln!(f, "4. Required vertices: {}", self.required_vertices)?;
        writeln!(f, "5. Required edges: {}", self.required_edges)?;
        writeln!(f, "6. Required arcs: {}", self.required_arcs)?;
        writeln!(f, "7. Density: {:.4}", self.density)?;
        writeln!(f, "8. Connected components: {}", self.components)?;
        writeln!(f, "9. Minimum degree: {}", self.min_degree)?;
        writeln!(f, "10. Maximum degree: {}", self.max_degree)
    }
}

/// All-pairs shortest traversal costs, following link orientation.
pub struct DistanceMatrix {
    n: usize,
    dist: Vec<Option<u64>>,
}

impl DistanceMatrix {
    /// Floyd-Warshall over the directed adjacency view; parallel links keep
    /// the cheapest cost.
    pub fn compute(instance: &Instance) -> Self {
        let n = vertex_bound(instance) + 1;
        let mut dist = vec![None; n * n];
        for v in 1..n {
            dist[v * n + v] = Some(0);
        }

        let mut relax = |from: usize, to: usize, cost: u64| {
            let cell = &mut dist[from * n + to];
            if cell.map_or(true, |d| cost < d) {
                *cell = Some(cost);
            }
        };
        for element in &instance.elements {
            if let GraphElement::Link(link) = element {
                relax(link.from, link.to, link.traversal_cost as u64);
                if !link.directed {
                    relax(link.to, link.from, link.traversal_cost as u64);
                }
            }
        }

        for k in 1..n {
            for i in 1..n {
                let Some(ik) = dist[i * n + k] else { continue };
                for j in 1..n {
                    if let Some(kj) = dist[k * n + j] {
                        let through = ik + kj;
                        let cell = &mut dist[i * n + j];
                        if cell.map_or(true, |d| through < d) {
                            *cell = Some(through);
                        }
                    }
                }
            }
        }

        DistanceMatrix { n, dist }
    }

    /// Shortest cost from `from` to `to`, `None` when unreachable
    pub fn distance(&self, from: usize, to: usize) -> Option<u64> {
        if from >= self.n || to >= self.n {
            return None;
        }
        self.dist[from * self.n + to]
    }

    fn reachable_pairs(&self) -> impl Iterator<Item = u64> + '_ {
        (1..self.n).flat_map(move |i| {
            (1..self.n).filter(move |&j| j != i).filter_map(move |j| self.distance(i, j))
        })
    }
}

/// Shortest-path summary reported by `analyze --extended`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStatistics {
    /// Ordered pairs of distinct vertices connected by some path
    pub reachable_pairs: usize,
    /// Largest finite shortest-path cost, `None` without reachable pairs
    pub diameter: Option<u64>,
    pub average_path_length: Option<f64>,
}

impl PathStatistics {
    pub fn compute(instance: &Instance) -> Self {
        Self::from_matrix(&DistanceMatrix::compute(instance))
    }

    pub fn from_matrix(matrix: &DistanceMatrix) -> Self {
        let (count, total, max) = matrix
            .reachable_pairs()
            .fold((0usize, 0u64, None::<u64>), |(count, total, max), d| {
                (count + 1, total + d, Some(max.map_or(d, |m| m.max(d))))
            });

        PathStatistics {
            reachable_pairs: count,
            diameter: max,
            average_path_length: (count > 0).then(|| total as f64 / count as f64),
        }
    }
}

impl std::fmt::Display for PathStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Reachable vertex pairs: {}", self.reachable_pairs)?;
        match self.diameter {
            Some(d) => writeln!(f, "Diameter: {}", d)?,
            None => writeln!(f, "Diameter: -")?,
        }
        match self.average_path_length {
            Some(avg) => writeln!(f, "Average shortest path length: {:.4}", avg),
            None => writeln!(f, "Average shortest path length: -"),
        }
    }
}
