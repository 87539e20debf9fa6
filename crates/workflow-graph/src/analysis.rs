//! Structural summaries of workflow documents
//!
//! [`analyse`] computes counts and graph facts straight from a
//! [`WorkflowDocument`] without rebuilding a [`Workflow`](crate::Workflow),
//! so it also works on cyclic or partially broken documents.
//! [`format_for_llm`] renders the result as bounded plain text for prompts.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::codec::WorkflowDocument;
use crate::constants::analysis as defaults;
use crate::error::{GraphError, Result};
use crate::types::NodeId;
use crate::validation;

/// Analysis options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Leave isolated nodes out of per-category and fan-in/out figures
    pub connected_only: bool,
    /// Maximum length of the formatted summary, in characters
    pub max_length: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            connected_only: defaults::CONNECTED_ONLY,
            max_length: defaults::MAX_LENGTH,
        }
    }
}

/// Structural facts about one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Every node in the document, isolated or not
    pub node_total: usize,
    pub node_count_by_category: BTreeMap<String, usize>,
    pub connection_count: usize,
    /// Nodes with no incident edge, in document order
    pub isolated_node_ids: Vec<NodeId>,
    /// Edges on the longest path, `None` when the graph is cyclic
    pub longest_path_length: Option<usize>,
    pub has_cycle: bool,
    /// Nodes on the first cycle found, in traversal order
    pub cycle_node_ids: Vec<NodeId>,
    pub fan_in_by_node: BTreeMap<NodeId, usize>,
    pub fan_out_by_node: BTreeMap<NodeId, usize>,
}

/// Analyse a document
///
/// With `connected_only`, isolated nodes are left out of
/// `node_count_by_category` and the fan-in/out maps; `node_total` and
/// `isolated_node_ids` always cover every node.
pub fn analyse(document: &WorkflowDocument, connected_only: bool) -> AnalysisResult {
    let ids: Vec<&str> = document.nodes.iter().map(|n| n.id.as_str()).collect();
    let known: HashSet<&str> = ids.iter().copied().collect();

    // Edges whose endpoints both exist
    let edges: Vec<(&str, &str)> = document
        .edges
        .iter()
        .map(|e| (e.source_node_id.as_str(), e.target_node_id.as_str()))
        .filter(|(s, t)| known.contains(s) && known.contains(t))
        .collect();

    let mut fan_in: HashMap<&str, usize> = HashMap::new();
    let mut fan_out: HashMap<&str, usize> = HashMap::new();
    for &(source, target) in &edges {
        *fan_out.entry(source).or_default() += 1;
        *fan_in.entry(target).or_default() += 1;
    }

    let is_isolated = |id: &str| !fan_in.contains_key(id) && !fan_out.contains_key(id);
    let isolated_node_ids: Vec<NodeId> = ids
        .iter()
        .filter(|&&id| is_isolated(id))
        .map(|id| id.to_string())
        .collect();

    let mut node_count_by_category = BTreeMap::new();
    let mut fan_in_by_node = BTreeMap::new();
    let mut fan_out_by_node = BTreeMap::new();
    for node in &document.nodes {
        let id = node.id.as_str();
        if connected_only && is_isolated(id) {
            continue;
        }
        *node_count_by_category
            .entry(node.category.as_str().to_string())
            .or_insert(0) += 1;
        fan_in_by_node.insert(node.id.clone(), fan_in.get(id).copied().unwrap_or(0));
        fan_out_by_node.insert(node.id.clone(), fan_out.get(id).copied().unwrap_or(0));
    }

    let cycle = validation::find_cycle_in(&ids, edges.iter().copied());
    let longest_path_length = match cycle {
        Some(_) => None,
        None => Some(longest_path(&ids, &edges)),
    };

    AnalysisResult {
        node_total: document.nodes.len(),
        node_count_by_category,
        connection_count: document.edges.len(),
        isolated_node_ids,
        longest_path_length,
        has_cycle: cycle.is_some(),
        cycle_node_ids: cycle.unwrap_or_default(),
        fan_in_by_node,
        fan_out_by_node,
    }
}

/// Analyse raw document text
pub fn analyse_json(text: &str, connected_only: bool) -> Result<AnalysisResult> {
    let document: WorkflowDocument =
        serde_json::from_str(text).map_err(|e| GraphError::deserialization("document", e))?;
    Ok(analyse(&document, connected_only))
}

/// Longest path in edges over an acyclic graph
fn longest_path(ids: &[&str], edges: &[(&str, &str)]) -> usize {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let mut successors = vec![Vec::new(); ids.len()];
    let mut in_degree = vec![0usize; ids.len()];
    for (source, target) in edges {
        if let (Some(&from), Some(&to)) = (index.get(source), index.get(target)) {
            successors[from].push(to);
            in_degree[to] += 1;
        }
    }

    let mut depth = vec![0usize; ids.len()];
    let mut queue: VecDeque<usize> = (0..ids.len()).filter(|&n| in_degree[n] == 0).collect();
    while let Some(node) = queue.pop_front() {
        for &succ in &successors[node] {
            depth[succ] = depth[succ].max(depth[node] + 1);
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                queue.push_back(succ);
            }
        }
    }

    depth.into_iter().max().unwrap_or(0)
}

/// Render a result as plain text no longer than `max_length` characters
///
/// Sections come in priority order: aggregate counts, category breakdown,
/// cycle, isolated nodes, fan-in, fan-out. Sections are never cut; output
/// stops before the first section that would exceed the limit.
pub fn format_for_llm(result: &AnalysisResult, max_length: usize) -> String {
    let mut out = String::new();
    let mut length = 0;

    for section in sections(result) {
        let separator = usize::from(!out.is_empty());
        let extra = separator + section.chars().count();
        if length + extra > max_length {
            break;
        }
        if separator == 1 {
            out.push('\n');
        }
        out.push_str(&section);
        length += extra;
    }

    out
}

fn sections(result: &AnalysisResult) -> Vec<String> {
    let longest = match result.longest_path_length {
        Some(length) => format!("longest path {} edge(s)", length),
        None => "longest path undefined (cyclic)".to_string(),
    };
    let mut sections = vec![format!(
        "Workflow: {} node(s), {} connection(s), {}",
        result.node_total, result.connection_count, longest
    )];

    if result.node_count_by_category.is_empty() {
        sections.push("Categories: none".to_string());
    } else {
        sections.push(format!(
            "Categories: {}",
            join_counts(result.node_count_by_category.iter())
        ));
    }

    if result.has_cycle {
        sections.push(format!("Cycle: {}", result.cycle_node_ids.join(" -> ")));
    }
    if !result.isolated_node_ids.is_empty() {
        sections.push(format!("Isolated: {}", result.isolated_node_ids.join(", ")));
    }

    let busy = |map: &BTreeMap<NodeId, usize>| -> Vec<(String, usize)> {
        map.iter()
            .filter(|(_, count)| **count > 0)
            .map(|(id, &count)| (id.clone(), count))
            .collect()
    };
    let fan_in = busy(&result.fan_in_by_node);
    if !fan_in.is_empty() {
        sections.push(format!("Fan-in: {}", join_counts(fan_in.iter().map(|(k, v)| (k, v)))));
    }
    let fan_out = busy(&result.fan_out_by_node);
    if !fan_out.is_empty() {
        sections.push(format!("Fan-out: {}", join_counts(fan_out.iter().map(|(k, v)| (k, v)))));
    }

    sections
}

fn join_counts<'a>(counts: impl Iterator<Item = (&'a String, &'a usize)>) -> String {
    counts
        .map(|(key, count)| format!("{}={}", key, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{EdgeDocument, NodeDocument};
    use crate::types::{NodeCategory, Position};

    fn node(id: &str, category: NodeCategory) -> NodeDocument {
        NodeDocument {
            id: id.to_string(),
            node_type: "T".to_string(),
            category,
            ports: Vec::new(),
            position: Position::default(),
        }
    }

    fn edge(source: &str, target: &str) -> EdgeDocument {
        EdgeDocument {
            source_node_id: source.to_string(),
            source_port: "out".to_string(),
            target_node_id: target.to_string(),
            target_port: "in".to_string(),
        }
    }

    fn document(edges: Vec<EdgeDocument>) -> WorkflowDocument {
        WorkflowDocument {
            nodes: vec![
                node("input", NodeCategory::TextProcessing),
                node("template", NodeCategory::TextProcessing),
                node("llm", NodeCategory::Llms),
                node("output", NodeCategory::Outputs),
                node("stray", NodeCategory::Tools),
            ],
            edges,
            metadata: Default::default(),
        }
    }

    fn chain() -> WorkflowDocument {
        document(vec![
            edge("input", "template"),
            edge("template", "llm"),
            edge("llm", "output"),
            edge("input", "llm"),
        ])
    }

    #[test]
    fn test_connected_only_excludes_isolated() {
        let result = analyse(&chain(), true);

        assert_eq!(result.node_total, 5);
        assert_eq!(result.connection_count, 4);
        assert_eq!(result.isolated_node_ids, vec!["stray"]);
        assert!(!result.node_count_by_category.contains_key("tools"));
        assert_eq!(result.node_count_by_category["textProcessing"], 2);
        assert!(!result.fan_in_by_node.contains_key("stray"));
        assert!(!result.fan_out_by_node.contains_key("stray"));
        assert_eq!(result.fan_in_by_node["llm"], 2);
        assert_eq!(result.fan_out_by_node["input"], 2);
        assert_eq!(result.longest_path_length, Some(3));
        assert!(!result.has_cycle);
    }

    #[test]
    fn test_all_nodes_counted_without_connected_only() {
        let result = analyse(&chain(), false);
        assert_eq!(result.node_count_by_category["tools"], 1);
        assert_eq!(result.fan_in_by_node["stray"], 0);
        assert_eq!(result.isolated_node_ids, vec!["stray"]);
    }

    #[test]
    fn test_cycle_reported() {
        let mut doc = chain();
        doc.edges.push(edge("output", "template"));
        let result = analyse(&doc, true);
        assert!(result.has_cycle);
        assert_eq!(result.cycle_node_ids, vec!["template", "llm", "output"]);
        assert_eq!(result.longest_path_length, None);
    }

    #[test]
    fn test_edges_to_unknown_nodes_are_ignored_structurally() {
        let doc = document(vec![edge("input", "ghost")]);
        let result = analyse(&doc, false);
        assert_eq!(result.connection_count, 1);
        assert_eq!(result.isolated_node_ids.len(), 5);
        assert_eq!(result.longest_path_length, Some(0));
    }

    #[test]
    fn test_format_sections_in_priority_order() {
        let text = format_for_llm(&analyse(&chain(), true), 2000);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Workflow: 5 node(s), 4 connection(s), longest path 3 edge(s)",
                "Categories: llms=1, outputs=1, textProcessing=2",
                "Isolated: stray",
                "Fan-in: llm=2, output=1, template=1",
                "Fan-out: input=2, llm=1, template=1",
            ]
        );
    }

    #[test]
    fn test_format_respects_limit_with_whole_sections() {
        let result = analyse(&chain(), true);
        let full = format_for_llm(&result, usize::MAX);

        for limit in [0, 10, 60, 61, 120, 200] {
            let text = format_for_llm(&result, limit);
            assert!(text.chars().count() <= limit, "limit {limit}");
            assert!(full.starts_with(&text));
            assert!(text.is_empty() || full[text.len()..].is_empty() || full[text.len()..].starts_with('\n'));
        }

        // The first section alone is 60 characters
        assert_eq!(format_for_llm(&result, 59), "");
        assert_eq!(format_for_llm(&result, 60).lines().count(), 1);
    }

    #[test]
    fn test_format_counts_characters_not_bytes() {
        let mut doc = document(Vec::new());
        doc.nodes = vec![node("提示", NodeCategory::TextProcessing), node("输出", NodeCategory::Outputs)];
        doc.edges = vec![edge("提示", "输出")];
        let result = analyse(&doc, true);
        let text = format_for_llm(&result, 200);
        assert!(text.contains("Fan-in: 输出=1"));
        assert!(text.chars().count() <= 200);
    }

    #[test]
    fn test_analyse_json() {
        let text = serde_json::to_string(&chain()).unwrap();
        let result = analyse_json(&text, true).unwrap();
        assert_eq!(result, analyse(&chain(), true));
        assert!(analyse_json("not json", true).is_err());
    }
}
