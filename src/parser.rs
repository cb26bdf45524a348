//! Line-oriented parser for NEARP instance files.
//!
//! The file is a sequence of `Label: value` header lines and tagged sections
//! (`ReN.`, `ReE.`, `EDGE`, `ReA.`, `ARC`) whose data lines are read according
//! to the section currently open. Parsing is a fold over the lines with the
//! pure [`transition`] function; malformed data lines are skipped.

use crate::instance::{GraphElement, Instance, LinkService, NodeService};
use std::str::FromStr;

/// Section currently open while scanning the file
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Section {
    #[default]
    None,
    /// `ReN.` required vertices
    Nodes,
    /// `ReE.` required edges
    RequiredEdges,
    /// `EDGE` plain edges
    PlainEdges,
    /// `ReA.` required arcs
    RequiredArcs,
    /// `ARC` plain arcs
    PlainArcs,
}

impl Section {
    /// Recognize a section marker line.
    ///
    /// Markers are matched as substrings, in this order, so a header such as
    /// `ReA. FROM N. TO N. T. COST` is never mistaken for a plain arc section.
    pub fn from_marker(line: &str) -> Option<Section> {
        if line.contains("ReN.") {
            Some(Section::Nodes)
        } else if line.contains("ReE.") {
            Some(Section::RequiredEdges)
        } else if line.contains("ReA.") {
            Some(Section::RequiredArcs)
        } else if line.contains("EDGE") {
            Some(Section::PlainEdges)
        } else if line.contains("ARC") {
            Some(Section::PlainArcs)
        } else {
            None
        }
    }

    fn is_required(self) -> bool {
        matches!(self, Section::RequiredEdges | Section::RequiredArcs)
    }

    fn is_directed(self) -> bool {
        matches!(self, Section::RequiredArcs | Section::PlainArcs)
    }
}

/// Scalar header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Header {
    Name(String),
    Capacity(u32),
    Depot(usize),
    OptimalValue(i64),
    Vehicles(i64),
}

/// Element read from a data line, before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementRecord {
    Node {
        vertex: usize,
        demand: u32,
        service_cost: u32,
    },
    Link {
        from: usize,
        to: usize,
        cost: u32,
        demand: u32,
        required: bool,
        directed: bool,
    },
}

impl ElementRecord {
    /// Highest vertex id this record references
    pub fn max_vertex(&self) -> usize {
        match *self {
            ElementRecord::Node { vertex, .. } => vertex,
            ElementRecord::Link { from, to, .. } => from.max(to),
        }
    }

    pub fn into_element(self, id: usize) -> GraphElement {
        match self {
            ElementRecord::Node { vertex, demand, service_cost } => {
                GraphElement::Node(NodeService { id, vertex, service_cost, demand })
            }
            ElementRecord::Link { from, to, cost, demand, required, directed } => {
                GraphElement::Link(LinkService {
                    id,
                    from,
                    to,
                    traversal_cost: cost,
                    demand,
                    required,
                    directed,
                })
            }
        }
    }
}

/// What a single line contributes to the instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineItem {
    Header(Header),
    Element(ElementRecord),
    /// A data or header line whose fields could not be read
    Malformed,
}

/// Replace tabs and whitespace runs with single spaces and trim the ends.
pub fn normalize(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Process one raw line in the given section.
///
/// Returns the section that is open after the line, and what the line
/// produced. Blank lines, section markers and unrecognized lines outside any
/// section produce nothing.
pub fn transition(section: Section, line: &str) -> (Section, Option<LineItem>) {
    let line = normalize(line);
    if line.is_empty() {
        return (section, None);
    }

    if let Some(item) = parse_header(&line) {
        return (section, Some(item));
    }

    if let Some(next) = Section::from_marker(&line) {
        return (next, None);
    }

    let item = match section {
        Section::None => None,
        Section::Nodes => Some(parse_node(&line)),
        _ => Some(parse_link(&line, section)),
    };
    (section, item)
}

/// Fold all lines of a file into an [`Instance`]
pub fn parse_lines<'a, I>(lines: I) -> Instance
where
    I: IntoIterator<Item = &'a str>,
{
    let mut instance = Instance::default();
    let mut section = Section::None;
    let mut skipped = 0usize;

    for (index, raw) in lines.into_iter().enumerate() {
        let (next, item) = transition(section, raw);

        match item {
            Some(LineItem::Header(header)) => apply_header(&mut instance, header),
            Some(LineItem::Element(record)) => {
                let id = instance.elements.len() + 1;
                instance.vertex_count = instance.vertex_count.max(record.max_vertex());
                instance.elements.push(record.into_element(id));
            }
            Some(LineItem::Malformed) => {
                skipped += 1;
                log::debug!("Skipping line {} ({:?}): {:?}", index + 1, section, raw.trim());
            }
            None => {}
        }

        section = next;
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed line(s) while parsing the instance", skipped);
    }

    instance
}

fn apply_header(instance: &mut Instance, header: Header) {
    match header {
        Header::Name(name) => instance.name = name,
        Header::Capacity(capacity) => instance.capacity = capacity,
        Header::Depot(depot) => instance.depot = depot,
        Header::OptimalValue(value) => instance.optimal_value = Some(value),
        Header::Vehicles(count) => instance.vehicles = Some(count),
    }
}

fn parse_header(line: &str) -> Option<LineItem> {
    if let Some(rest) = line.strip_prefix("Capacity:") {
        return Some(header_value(rest, Header::Capacity));
    }
    if let Some(rest) = line.strip_prefix("Depot Node:") {
        return Some(header_value(rest, Header::Depot));
    }
    if let Some(rest) = line.strip_prefix("Name:") {
        let name = rest.trim();
        return Some(if name.is_empty() {
            LineItem::Malformed
        } else {
            LineItem::Header(Header::Name(name.to_string()))
        });
    }
    if let Some(rest) = line.strip_prefix("Optimal value:") {
        return Some(header_value(rest, Header::OptimalValue));
    }
    if let Some(rest) = line.strip_prefix("#Vehicles:") {
        return Some(header_value(rest, Header::Vehicles));
    }
    None
}

/// Reads the leading integer of the value, ignoring trailing text
/// (`Capacity: 25 units` and `Capacity: 25units` both give 25).
fn header_value<T: FromStr>(rest: &str, make: impl FnOnce(T) -> Header) -> LineItem {
    leading_integer(rest)
        .and_then(|token| token.parse().ok())
        .map(|value| LineItem::Header(make(value)))
        .unwrap_or(LineItem::Malformed)
}

fn leading_integer(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let sign = usize::from(text.starts_with(['-', '+']));
    let digits = text[sign..].bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0).then(|| &text[..sign + digits])
}

fn vertex_id(token: &str) -> Option<usize> {
    token.parse().ok().filter(|&v| v > 0)
}

/// `N<vertex> <demand> <service cost>`
fn parse_node(line: &str) -> LineItem {
    node_record(line)
        .map(LineItem::Element)
        .unwrap_or(LineItem::Malformed)
}

fn node_record(line: &str) -> Option<ElementRecord> {
    let mut tokens = line.split(' ');
    let vertex = tokens.next()?.strip_prefix('N').and_then(vertex_id)?;
    let demand = tokens.next()?.parse().ok()?;
    let service_cost = tokens.next()?.parse().ok()?;
    Some(ElementRecord::Node { vertex, demand, service_cost })
}

/// `<tag> <from> <to> <cost> [<demand> <service cost>]`
///
/// Required sections read the demand; the trailing service cost column is
/// ignored. Plain sections stop after the cost.
fn parse_link(line: &str, section: Section) -> LineItem {
    link_record(line, section)
        .map(LineItem::Element)
        .unwrap_or(LineItem::Malformed)
}

fn link_record(line: &str, section: Section) -> Option<ElementRecord> {
    let required = section.is_required();
    let directed = section.is_directed();
    let mut tokens = line.split(' ').skip(1);

    let from = vertex_id(tokens.next()?)?;
    let to = vertex_id(tokens.next()?)?;
    let cost = tokens.next()?.parse().ok()?;
    let demand = if required { tokens.next()?.parse().ok()? } else { 0 };
    Some(ElementRecord::Link { from, to, cost, demand, required, directed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::ElementKind;

    const SAMPLE: &str = include_str!("../data/sample.dat");

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("E1\t1  2\t\t3 "), "E1 1 2 3");
        assert_eq!(normalize("  \t "), "");
    }

    #[test]
    fn test_section_markers() {
        assert_eq!(Section::from_marker("ReN. DEMAND S. COST"), Some(Section::Nodes));
        assert_eq!(Section::from_marker("ReE. From N. To N. T. COST DEMAND S. COST"), Some(Section::RequiredEdges));
        assert_eq!(Section::from_marker("ReA. FROM N. TO N. T. COST DEMAND S. COST"), Some(Section::RequiredArcs));
        assert_eq!(Section::from_marker("EDGE FROM N. TO N. T. COST"), Some(Section::PlainEdges));
        assert_eq!(Section::from_marker("NrE EDGE"), Some(Section::PlainEdges));
        assert_eq!(Section::from_marker("ARC FROM N. TO N. T. COST"), Some(Section::PlainArcs));
        assert_eq!(Section::from_marker("#Required E: 3"), None);
    }

    #[test]
    fn test_transition_changes_section_only_on_markers() {
        let (section, item) = transition(Section::None, "ReE.\tFrom N.\tTo N.");
        assert_eq!(section, Section::RequiredEdges);
        assert!(item.is_none());

        let (section, item) = transition(section, "E1\t1\t2\t13\t1\t13");
        assert_eq!(section, Section::RequiredEdges);
        assert_eq!(
            item,
            Some(LineItem::Element(ElementRecord::Link {
                from: 1,
                to: 2,
                cost: 13,
                demand: 1,
                required: true,
                directed: false,
            }))
        );
    }

    #[test]
    fn test_headers_recognized_inside_sections() {
        let (section, item) = transition(Section::PlainArcs, "Capacity:\t 25");
        assert_eq!(section, Section::PlainArcs);
        assert_eq!(item, Some(LineItem::Header(Header::Capacity(25))));

        let (_, item) = transition(Section::Nodes, "Depot Node:  3");
        assert_eq!(item, Some(LineItem::Header(Header::Depot(3))));

        let (_, item) = transition(Section::None, "Capacity: lots");
        assert_eq!(item, Some(LineItem::Malformed));
    }

    #[test]
    fn test_header_values_ignore_trailing_text() {
        let (_, item) = transition(Section::None, "Capacity: 25units");
        assert_eq!(item, Some(LineItem::Header(Header::Capacity(25))));

        let (_, item) = transition(Section::None, "Capacity: 25 units");
        assert_eq!(item, Some(LineItem::Header(Header::Capacity(25))));

        let (_, item) = transition(Section::None, "Optimal value: -1 (unknown)");
        assert_eq!(item, Some(LineItem::Header(Header::OptimalValue(-1))));

        let (_, item) = transition(Section::None, "Capacity: -5");
        assert_eq!(item, Some(LineItem::Malformed));

        let (_, item) = transition(Section::None, "Depot Node: -");
        assert_eq!(item, Some(LineItem::Malformed));
    }

    #[test]
    fn test_plain_link_ignores_demand_columns() {
        let (_, item) = transition(Section::PlainEdges, "NrE1 3 4 5 9 9");
        assert_eq!(
            item,
            Some(LineItem::Element(ElementRecord::Link {
                from: 3,
                to: 4,
                cost: 5,
                demand: 0,
                required: false,
                directed: false,
            }))
        );
    }

    #[test]
    fn test_node_lines() {
        let (_, item) = transition(Section::Nodes, "N12 3 7");
        assert_eq!(
            item,
            Some(LineItem::Element(ElementRecord::Node { vertex: 12, demand: 3, service_cost: 7 }))
        );

        assert_eq!(transition(Section::Nodes, "X12 3 7").1, Some(LineItem::Malformed));
        assert_eq!(transition(Section::Nodes, "N12 3").1, Some(LineItem::Malformed));
        assert_eq!(transition(Section::Nodes, "N0 3 7").1, Some(LineItem::Malformed));
    }

    #[test]
    fn test_unknown_lines_outside_sections_are_ignored() {
        assert_eq!(transition(Section::None, "#Nodes: 6").1, None);
        assert_eq!(transition(Section::None, "E1 1 2 3 4 5").1, None);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "Capacity: 9\nReE.\nE1 1 2 3 4 3\nE2 1 x 3 4 3\nE3 2 3\nE4 2 3 1 1 1\n";
        let instance = Instance::parse(text);

        assert_eq!(instance.elements.len(), 2);
        assert_eq!(instance.elements[0].id(), 1);
        assert_eq!(instance.elements[1].id(), 2);
        assert_eq!(instance.elements[1].endpoints(), (2, 3));
    }

    #[test]
    fn test_negative_values_are_skipped() {
        let instance = Instance::parse("ReE.\nE1 1 2 -3 4 3\nE2 1 2 3 4 3\n");
        assert_eq!(instance.elements.len(), 1);
        assert_eq!(instance.elements[0].cost(), 3);
    }

    #[test]
    fn test_sample_file() {
        let instance = Instance::parse(SAMPLE);

        assert_eq!(instance.name, "sample-mixed");
        assert_eq!(instance.capacity, 10);
        assert_eq!(instance.depot, 1);
        assert_eq!(instance.optimal_value, Some(-1));
        assert_eq!(instance.vehicles, Some(-1));
        assert_eq!(instance.vertex_count, 6);
        assert_eq!(instance.elements.len(), 9);

        let ids: Vec<usize> = instance.elements.iter().map(|e| e.id()).collect();
        assert_eq!(ids, (1..=9).collect::<Vec<_>>());

        assert_eq!(instance.count_kind(ElementKind::Node, false), 2);
        assert_eq!(instance.count_kind(ElementKind::Edge, false), 4);
        assert_eq!(instance.count_kind(ElementKind::Edge, true), 2);
        assert_eq!(instance.count_kind(ElementKind::Arc, false), 3);
        assert_eq!(instance.count_kind(ElementKind::Arc, true), 2);
    }

    #[test]
    fn test_vertex_count_is_max_referenced_vertex() {
        let text = "ReN.\nN9 1 1\nARC\nNrA1 2 14 3\nEDGE\nNrE1 3 4 1\n";
        let instance = Instance::parse(text);

        let max_seen = instance
            .elements
            .iter()
            .map(|e| {
                let (a, b) = e.endpoints();
                a.max(b)
            })
            .max()
            .unwrap();
        assert_eq!(instance.vertex_count, 14);
        assert_eq!(instance.vertex_count, max_seen);
    }

    #[test]
    fn test_headers_after_sections() {
        let text = "ReE.\nE1 1 2 3 4 3\nCapacity: 12\nE2 2 3 3 4 3\nDepot Node: 2\n";
        let instance = Instance::parse(text);

        assert_eq!(instance.capacity, 12);
        assert_eq!(instance.depot, 2);
        assert_eq!(instance.elements.len(), 2);
    }
}
