//! Module for representing NEARP/CARP instances.
//!
//! An instance is a mixed graph whose elements are required vertices,
//! required or plain undirected edges and required or plain directed arcs,
//! together with the vehicle capacity and the depot vertex.

use crate::error::{Error, Result};
use crate::parser;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A required vertex serviced in place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeService {
    /// Element identifier (1-indexed, shared with links)
    pub id: usize,
    /// Serviced vertex
    pub vertex: usize,
    pub service_cost: u32,
    pub demand: u32,
}

/// An edge (`directed == false`) or an arc (`directed == true`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkService {
    /// Element identifier (1-indexed, shared with nodes)
    pub id: usize,
    pub from: usize,
    pub to: usize,
    pub traversal_cost: u32,
    /// Demand to collect; always 0 for plain links
    pub demand: u32,
    /// Whether a route must service this link
    pub required: bool,
    pub directed: bool,
}

/// Kind of graph element, as reported in statistics and exports
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ElementKind {
    Node,
    Edge,
    Arc,
}

/// Any element of the instance graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GraphElement {
    Node(NodeService),
    Link(LinkService),
}

impl GraphElement {
    pub fn id(&self) -> usize {
        match self {
            GraphElement::Node(n) => n.id,
            GraphElement::Link(l) => l.id,
        }
    }

    /// Cost charged when a route services this element: the service cost of
    /// a node or the traversal cost of a link.
    pub fn cost(&self) -> u32 {
        match self {
            GraphElement::Node(n) => n.service_cost,
            GraphElement::Link(l) => l.traversal_cost,
        }
    }

    pub fn demand(&self) -> u32 {
        match self {
            GraphElement::Node(n) => n.demand,
            GraphElement::Link(l) => l.demand,
        }
    }

    /// Node services are always required.
    pub fn is_required(&self) -> bool {
        match self {
            GraphElement::Node(_) => true,
            GraphElement::Link(l) => l.required,
        }
    }

    /// `(from, to)` for links, `(vertex, vertex)` for nodes
    pub fn endpoints(&self) -> (usize, usize) {
        match self {
            GraphElement::Node(n) => (n.vertex, n.vertex),
            GraphElement::Link(l) => (l.from, l.to),
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            GraphElement::Node(_) => ElementKind::Node,
            GraphElement::Link(l) if l.directed => ElementKind::Arc,
            GraphElement::Link(_) => ElementKind::Edge,
        }
    }

    pub fn as_link(&self) -> Option<&LinkService> {
        match self {
            GraphElement::Link(l) => Some(l),
            GraphElement::Node(_) => None,
        }
    }
}

/// Represents a complete NEARP instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    /// Name of the instance (`Name:` header), empty when absent
    pub name: String,
    /// Highest vertex id referenced by any element
    pub vertex_count: usize,
    /// Vehicle capacity (maximum total demand per route)
    pub capacity: u32,
    /// Depot vertex
    pub depot: usize,
    /// Best known objective (`Optimal value:` header); -1 in most files
    pub optimal_value: Option<i64>,
    /// Fleet size (`#Vehicles:` header); -1 means unlimited
    pub vehicles: Option<i64>,
    /// Elements in file order; `elements[i].id() == i + 1`
    pub elements: Vec<GraphElement>,
    /// File the instance was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Instance {
    /// Parse an instance from a file.
    ///
    /// Failing to open or read the file is the only error; malformed data
    /// lines are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::open(path, e))?;
        let mut instance = Self::from_reader(BufReader::new(file))
            .map_err(|e| match e {
                Error::Open { source, .. } => Error::open(path, source),
                other => other,
            })?;

        instance.source = Some(path.to_path_buf());

        if instance.name.is_empty() {
            if let Some(stem) = path.file_stem() {
                instance.name = stem.to_string_lossy().into_owned();
            }
        }

        log::info!(
            "Loaded instance {} ({} vertices, {} elements, {} required)",
            instance.name,
            instance.vertex_count,
            instance.elements.len(),
            instance.required_count()
        );

        Ok(instance)
    }

    /// Parse an instance from any buffered reader.
    ///
    /// Lines are decoded lossily, so bytes that are not UTF-8 (Latin-1
    /// comments) never abort the read.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for line in reader.split(b'\n') {
            let bytes = line.map_err(|e| Error::open("<input>", e))?;
            lines.push(String::from_utf8_lossy(&bytes).into_owned());
        }
        Ok(parser::parse_lines(lines.iter().map(String::as_str)))
    }

    /// Parse an instance from in-memory text
    pub fn parse(text: &str) -> Self {
        parser::parse_lines(text.lines())
    }

    /// Look up an element by its 1-based id
    pub fn element(&self, id: usize) -> Option<&GraphElement> {
        id.checked_sub(1).and_then(|i| self.elements.get(i))
    }

    /// All edges and arcs, required or not
    pub fn links(&self) -> impl Iterator<Item = &LinkService> {
        self.elements.iter().filter_map(GraphElement::as_link)
    }

    pub fn required_elements(&self) -> impl Iterator<Item = &GraphElement> {
        self.elements.iter().filter(|e| e.is_required())
    }

    pub fn required_count(&self) -> usize {
        self.required_elements().count()
    }

    /// Sum of the demands of all required elements
    pub fn total_demand(&self) -> u64 {
        self.required_elements().map(|e| e.demand() as u64).sum()
    }

    /// Number of elements of the given kind; `required_only` restricts the
    /// count to required ones.
    pub fn count_kind(&self, kind: ElementKind, required_only: bool) -> usize {
        self.elements
            .iter()
            .filter(|e| e.kind() == kind && (!required_only || e.is_required()))
            .count()
    }

    /// Largest single demand among required elements
    pub fn max_demand(&self) -> u32 {
        self.required_elements().map(|e| e.demand()).max().unwrap_or(0)
    }
}
