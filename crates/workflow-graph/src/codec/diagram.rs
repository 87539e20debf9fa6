//! Flowchart diagram export and parsing
//!
//! Emits Mermaid flowchart text: a direction header, one declaration per
//! node in insertion order (label `id (type)`, shape keyed by category),
//! then one edge per connection in declaration order with a
//! `source_port->target_port` label. [`parse_diagram`] reads that text back
//! into a [`DiagramOutline`].

use std::collections::HashSet;

use crate::error::{GraphError, Result};
use crate::layout::LayoutDirection;
use crate::types::NodeCategory;
use crate::workflow::Workflow;

const INDENT: &str = "    ";

/// Diagram export options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiagramOptions {
    /// Direction written in the flowchart header
    pub direction: LayoutDirection,
}

/// Node outline shapes used in the diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Rect,
    Subroutine,
    Stadium,
    Circle,
    Rhombus,
    Hexagon,
    Parallelogram,
    Cylinder,
}

impl NodeShape {
    // Longer delimiters first so parsing never matches a prefix of another shape
    const ALL: [NodeShape; 8] = [
        Self::Subroutine,
        Self::Cylinder,
        Self::Parallelogram,
        Self::Stadium,
        Self::Circle,
        Self::Hexagon,
        Self::Rect,
        Self::Rhombus,
    ];

    pub fn for_category(category: &NodeCategory) -> Self {
        match category {
            NodeCategory::Triggers => Self::Circle,
            NodeCategory::TextProcessing => Self::Rect,
            NodeCategory::Llms => Self::Subroutine,
            NodeCategory::Outputs => Self::Stadium,
            NodeCategory::Tools => Self::Hexagon,
            NodeCategory::FileProcessing => Self::Parallelogram,
            NodeCategory::ImageGeneration | NodeCategory::MediaProcessing => Self::Parallelogram,
            NodeCategory::WebCrawlers | NodeCategory::VectorDb => Self::Cylinder,
            NodeCategory::ControlFlows => Self::Rhombus,
            NodeCategory::Custom(_) => Self::Rect,
        }
    }

    fn delimiters(&self) -> (&'static str, &'static str) {
        match self {
            Self::Rect => ("[", "]"),
            Self::Subroutine => ("[[", "]]"),
            Self::Stadium => ("([", "])"),
            Self::Circle => ("((", "))"),
            Self::Rhombus => ("{", "}"),
            Self::Hexagon => ("{{", "}}"),
            Self::Parallelogram => ("[/", "/]"),
            Self::Cylinder => ("[(", ")]"),
        }
    }
}

/// A node declaration read back from diagram text
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
}

/// An edge read back from diagram text
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramEdge {
    pub from: String,
    pub to: String,
    pub source_port: Option<String>,
    pub target_port: Option<String>,
}

/// Structure recovered from flowchart text
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramOutline {
    pub direction: LayoutDirection,
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<DiagramEdge>,
}

/// Render a workflow as a left-to-right flowchart
pub fn to_diagram(workflow: &Workflow) -> String {
    to_diagram_with(workflow, &DiagramOptions::default())
}

/// Render a workflow as a flowchart with the given options
pub fn to_diagram_with(workflow: &Workflow, options: &DiagramOptions) -> String {
    let ids = diagram_ids(workflow);
    let mut out = format!("flowchart {}\n", options.direction.as_str());

    for (node, id) in workflow.nodes().iter().zip(&ids) {
        let (open, close) = NodeShape::for_category(&node.category).delimiters();
        let label = escape(&format!("{} ({})", node.id, node.node_type));
        out.push_str(&format!("{INDENT}{id}{open}\"{label}\"{close}\n"));
    }

    for connection in workflow.connections() {
        let (Some(from), Some(to)) = (
            workflow.node_index(&connection.source_node_id),
            workflow.node_index(&connection.target_node_id),
        ) else {
            continue;
        };
        let label = format!(
            "{}->{}",
            escape(&connection.source_port),
            escape(&connection.target_port)
        );
        out.push_str(&format!(
            "{INDENT}{} -->|\"{label}\"| {}\n",
            ids[from], ids[to]
        ));
    }

    out
}

/// Diagram-safe identifiers, one per node in insertion order
fn diagram_ids(workflow: &Workflow) -> Vec<String> {
    let mut taken = HashSet::new();
    workflow
        .nodes()
        .iter()
        .map(|node| {
            let mut id: String = node
                .id
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
                .collect();
            if id.is_empty() || RESERVED.iter().any(|word| id.eq_ignore_ascii_case(word)) {
                id.push_str("_node");
            }
            if taken.insert(id.clone()) {
                return id;
            }
            (1..)
                .map(|suffix| format!("{}_{}", id, suffix))
                .find(|candidate| taken.insert(candidate.clone()))
                .unwrap_or_default()
        })
        .collect()
}

/// Flowchart keywords that cannot stand as node ids
const RESERVED: [&str; 9] = [
    "end",
    "graph",
    "subgraph",
    "style",
    "class",
    "classDef",
    "click",
    "linkStyle",
    "direction",
];

/// Entity-encode characters that would end a label or read as an arrow.
/// `#` goes first so literal entity text survives the round trip.
fn escape(text: &str) -> String {
    text.replace('#', "#35;")
        .replace('"', "#quot;")
        .replace('|', "#124;")
        .replace('>', "#62;")
}

fn unescape(text: &str) -> String {
    text.replace("#quot;", "\"")
        .replace("#124;", "|")
        .replace("#62;", ">")
        .replace("#35;", "#")
}

/// Strip one layer of surrounding double quotes
fn unquote(text: &str) -> &str {
    let text = text.trim();
    text.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(text)
}

/// Parse flowchart text produced by [`to_diagram`]
///
/// Blank lines and `%%` comments are ignored. The first statement must be a
/// `flowchart` (or `graph`) header. Edges without a label have no ports.
pub fn parse_diagram(text: &str) -> Result<DiagramOutline> {
    let mut statements = text
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with("%%"));

    let (line_no, header) = statements
        .next()
        .ok_or_else(|| GraphError::deserialization("line 1", "empty diagram"))?;
    let direction = parse_header(header)
        .ok_or_else(|| GraphError::deserialization(format!("line {line_no}"), "expected flowchart header"))?;

    let mut outline = DiagramOutline {
        direction,
        nodes: Vec::new(),
        edges: Vec::new(),
    };

    for (line_no, line) in statements {
        let location = format!("line {line_no}");
        if line.contains("-->") {
            outline.edges.push(parse_edge(line, &location)?);
        } else {
            outline.nodes.push(parse_node(line, &location)?);
        }
    }

    Ok(outline)
}

fn parse_header(line: &str) -> Option<LayoutDirection> {
    let mut words = line.split_whitespace();
    if !matches!(words.next(), Some("flowchart" | "graph")) {
        return None;
    }
    match words.next() {
        None | Some("TB" | "TD") => Some(LayoutDirection::TB),
        Some("LR") => Some(LayoutDirection::LR),
        Some("RL") => Some(LayoutDirection::RL),
        Some("BT") => Some(LayoutDirection::BT),
        Some(_) => None,
    }
}

fn parse_node(line: &str, location: &str) -> Result<DiagramNode> {
    let split = line
        .find(['[', '(', '{'])
        .ok_or_else(|| GraphError::deserialization(location, "node declaration has no shape"))?;
    let (id, body) = line.split_at(split);
    let id = id.trim();
    if id.is_empty() {
        return Err(GraphError::deserialization(location, "node declaration has no id"));
    }

    let (shape, inner) = NodeShape::ALL
        .iter()
        .find_map(|shape| {
            let (open, close) = shape.delimiters();
            body.strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
                .map(|inner| (*shape, inner))
        })
        .ok_or_else(|| GraphError::deserialization(location, format!("unknown shape '{body}'")))?;

    Ok(DiagramNode {
        id: id.to_string(),
        label: unescape(unquote(inner)),
        shape,
    })
}

fn parse_edge(line: &str, location: &str) -> Result<DiagramEdge> {
    let (from, rest) = line
        .split_once("-->")
        .ok_or_else(|| GraphError::deserialization(location, "expected '-->'"))?;
    let rest = rest.trim_start();

    let (label, to) = match rest.strip_prefix('|') {
        Some(labelled) => {
            let (label, to) = labelled
                .split_once('|')
                .ok_or_else(|| GraphError::deserialization(location, "unterminated edge label"))?;
            (Some(unquote(label)), to)
        }
        None => (None, rest),
    };

    let from = from.trim();
    let to = to.trim();
    if from.is_empty() || to.is_empty() {
        return Err(GraphError::deserialization(location, "edge is missing an endpoint"));
    }

    let (source_port, target_port) = match label.and_then(|l| l.split_once("->")) {
        Some((source, target)) => (
            Some(unescape(source.trim())),
            Some(unescape(target.trim())),
        ),
        None => (None, None),
    };

    Ok(DiagramEdge {
        from: from.to_string(),
        to: to.to_string(),
        source_port,
        target_port,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, Port, PortDataType};

    fn node(id: &str, node_type: &str, category: NodeCategory) -> Node {
        let mut node = Node::new(id, node_type, category);
        node.add_port(Port::input("in", PortDataType::Text)).unwrap();
        node.add_port(Port::output("out", PortDataType::Text)).unwrap();
        node
    }

    fn sample() -> Workflow {
        let mut workflow = Workflow::new();
        workflow
            .add_nodes(vec![
                node("input", "TextInOut", NodeCategory::TextProcessing),
                node("llm", "OpenAI", NodeCategory::Llms),
                node("output", "Text", NodeCategory::Outputs),
            ])
            .unwrap();
        workflow.connect("input", "out", "llm", "in").unwrap();
        workflow.connect("llm", "out", "output", "in").unwrap();
        workflow
    }

    #[test]
    fn test_diagram_lines_in_order() {
        let text = to_diagram(&sample());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "flowchart LR",
                "    input[\"input (TextInOut)\"]",
                "    llm[[\"llm (OpenAI)\"]]",
                "    output([\"output (Text)\"])",
                "    input -->|\"out->in\"| llm",
                "    llm -->|\"out->in\"| output",
            ]
        );
    }

    #[test]
    fn test_diagram_is_stable() {
        let workflow = sample();
        assert_eq!(to_diagram(&workflow), to_diagram(&workflow.clone()));
    }

    #[test]
    fn test_unsafe_ids_are_sanitized() {
        let mut workflow = Workflow::new();
        workflow
            .add_nodes(vec![
                node("a-1", "X", NodeCategory::Tools),
                node("a_1", "X", NodeCategory::Tools),
                node("end", "X", NodeCategory::Custom("misc".into())),
            ])
            .unwrap();
        let text = to_diagram(&workflow);
        assert!(text.contains("    a_1{{\"a-1 (X)\"}}"));
        assert!(text.contains("    a_1_1{{\"a_1 (X)\"}}"));
        assert!(text.contains("    end_node[\"end (X)\"]"));
    }

    #[test]
    fn test_suffixed_ids_never_collide() {
        let mut workflow = Workflow::new();
        workflow
            .add_nodes(vec![
                node("x__1", "X", NodeCategory::Tools),
                node("x-", "X", NodeCategory::Tools),
                node("x_", "X", NodeCategory::Tools),
                node("x.", "X", NodeCategory::Tools),
            ])
            .unwrap();

        let outline = parse_diagram(&to_diagram(&workflow)).unwrap();
        let ids: Vec<&str> = outline.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["x__1", "x_", "x__2", "x__3"]);
    }

    #[test]
    fn test_flowchart_keywords_are_renamed() {
        let mut workflow = Workflow::new();
        workflow
            .add_nodes(vec![
                node("subgraph", "X", NodeCategory::Tools),
                node("classDef", "X", NodeCategory::Tools),
                node("Style", "X", NodeCategory::Tools),
                node("styles", "X", NodeCategory::Tools),
            ])
            .unwrap();

        let outline = parse_diagram(&to_diagram(&workflow)).unwrap();
        let ids: Vec<&str> = outline.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["subgraph_node", "classDef_node", "Style_node", "styles"]);
    }

    #[test]
    fn test_pipes_and_hashes_survive_labels() {
        let mut workflow = Workflow::new();
        let mut left = Node::new("left", "A|B", NodeCategory::Tools);
        left.add_port(Port::output("out|1", PortDataType::Text)).unwrap();
        let mut right = Node::new("right", "#quot; -->", NodeCategory::Tools);
        right.add_port(Port::input("in->2", PortDataType::Text)).unwrap();
        workflow.add_nodes(vec![left, right]).unwrap();
        workflow.connect("left", "out|1", "right", "in->2").unwrap();

        let text = to_diagram(&workflow);
        assert!(text.contains("    left -->|\"out#124;1->in-#62;2\"| right"));

        let outline = parse_diagram(&text).unwrap();
        assert_eq!(outline.nodes.len(), 2);
        assert_eq!(outline.nodes[0].label, "left (A|B)");
        assert_eq!(outline.nodes[1].label, "right (#quot; -->)");
        assert_eq!(outline.edges.len(), 1);
        assert_eq!(outline.edges[0].source_port.as_deref(), Some("out|1"));
        assert_eq!(outline.edges[0].target_port.as_deref(), Some("in->2"));
    }

    #[test]
    fn test_parse_round_trip() {
        let workflow = sample();
        let options = DiagramOptions {
            direction: LayoutDirection::TB,
        };
        let outline = parse_diagram(&to_diagram_with(&workflow, &options)).unwrap();

        assert_eq!(outline.direction, LayoutDirection::TB);
        let ids: Vec<&str> = outline.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["input", "llm", "output"]);
        assert_eq!(outline.nodes[1].label, "llm (OpenAI)");
        assert_eq!(outline.nodes[1].shape, NodeShape::Subroutine);
        assert_eq!(outline.nodes[2].shape, NodeShape::Stadium);
        assert_eq!(outline.edges.len(), 2);
        assert_eq!(outline.edges[0].from, "input");
        assert_eq!(outline.edges[0].to, "llm");
        assert_eq!(outline.edges[0].source_port.as_deref(), Some("out"));
        assert_eq!(outline.edges[0].target_port.as_deref(), Some("in"));
    }

    #[test]
    fn test_every_shape_parses_back() {
        for shape in NodeShape::ALL {
            let (open, close) = shape.delimiters();
            let text = format!("flowchart LR\n  n{open}\"n (T)\"{close}\n");
            let outline = parse_diagram(&text).unwrap();
            assert_eq!(outline.nodes[0].shape, shape);
            assert_eq!(outline.nodes[0].label, "n (T)");
        }
    }

    #[test]
    fn test_parse_quotes_and_plain_edges() {
        let text = "%% comment\ngraph\n  a[\"say #quot;hi#quot;\"]\n  b[b]\n  a --> b\n";
        let outline = parse_diagram(text).unwrap();
        assert_eq!(outline.direction, LayoutDirection::TB);
        assert_eq!(outline.nodes[0].label, "say \"hi\"");
        assert_eq!(outline.nodes[1].label, "b");
        assert_eq!(outline.edges[0].source_port, None);
    }

    #[test]
    fn test_parse_errors_name_line() {
        let err = parse_diagram("sequenceDiagram\n").unwrap_err();
        assert!(matches!(err, GraphError::Deserialization { ref location, .. } if location == "line 1"));

        let err = parse_diagram("flowchart LR\n\n  lonely\n").unwrap_err();
        assert!(matches!(err, GraphError::Deserialization { ref location, .. } if location == "line 3"));

        assert!(parse_diagram("").is_err());
    }
}
