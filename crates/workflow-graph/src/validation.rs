//! Structural validation for workflow graphs
//!
//! Validation is advisory: a graph under construction may legitimately be
//! cyclic or have isolated nodes, so findings are reported, never raised.
//! All checks run to completion and every finding is listed.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::GraphError;
use crate::registry::NodeRegistry;
use crate::types::NodeId;
use crate::workflow::Workflow;

/// A single validation finding with location context
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationIssue {
    /// A cycle runs through these nodes, in traversal order
    CycleDetected { witness: Vec<NodeId> },
    /// A node has no incident connections
    IsolatedNode { node_id: NodeId },
    /// A connection references a node or port that does not exist
    DanglingConnection { index: usize, reason: String },
    /// A connection joins ports of the wrong direction or incompatible types
    TypeViolation { index: usize, reason: String },
    /// An input port holds more connections than it accepts
    ArityExceeded {
        node_id: NodeId,
        port: String,
        count: usize,
        limit: usize,
    },
    /// A node's type tag is not in the registry
    UnknownNodeType { node_id: NodeId, node_type: String },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleDetected { witness } => {
                write!(f, "Cycle detected through {}", witness.join(" -> "))
            }
            Self::IsolatedNode { node_id } => write!(f, "Node '{}' has no connections", node_id),
            Self::DanglingConnection { index, reason } => {
                write!(f, "Connection {} is dangling: {}", index, reason)
            }
            Self::TypeViolation { index, reason } => {
                write!(f, "Connection {} is invalid: {}", index, reason)
            }
            Self::ArityExceeded {
                node_id,
                port,
                count,
                limit,
            } => write!(
                f,
                "Input '{}' on node '{}' has {} connections, accepts {}",
                port, node_id, count, limit
            ),
            Self::UnknownNodeType { node_id, node_type } => {
                write!(f, "Unknown node type '{}' for node '{}'", node_type, node_id)
            }
        }
    }
}

/// Result of a structural check
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub no_cycle: bool,
    pub no_isolated_nodes: bool,
    pub no_dangling_connections: bool,
    /// Also false when an input port exceeds its arity
    pub no_type_violations: bool,
    /// Node sequence of the first cycle found, if any
    pub cycle_witness: Option<Vec<NodeId>>,
    /// Isolated node ids in insertion order
    pub isolated_nodes: Vec<NodeId>,
    /// Every finding, in check order
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether every structural property holds
    pub fn is_valid(&self) -> bool {
        self.no_cycle
            && self.no_isolated_nodes
            && self.no_dangling_connections
            && self.no_type_violations
            && self.issues.is_empty()
    }
}

/// Check a workflow's structure
pub fn check(workflow: &Workflow) -> ValidationReport {
    let mut issues = Vec::new();

    let (no_dangling_connections, no_type_violations) = check_connections(workflow, &mut issues);

    let cycle_witness = find_cycle(workflow);
    if let Some(witness) = &cycle_witness {
        issues.push(ValidationIssue::CycleDetected {
            witness: witness.clone(),
        });
    }

    let isolated_nodes = isolated_nodes(workflow);
    for node_id in &isolated_nodes {
        issues.push(ValidationIssue::IsolatedNode {
            node_id: node_id.clone(),
        });
    }

    let report = ValidationReport {
        no_cycle: cycle_witness.is_none(),
        no_isolated_nodes: isolated_nodes.is_empty(),
        no_dangling_connections,
        no_type_violations,
        cycle_witness,
        isolated_nodes,
        issues,
    };
    log::debug!(
        "Checked workflow with {} nodes: {} issue(s)",
        workflow.nodes().len(),
        report.issues.len()
    );
    report
}

/// Check a workflow and additionally flag node types missing from the registry
pub fn check_with_registry(workflow: &Workflow, registry: &NodeRegistry) -> ValidationReport {
    let mut report = check(workflow);
    for node in workflow.nodes() {
        if !registry.has_node_type(&node.node_type) {
            report.issues.push(ValidationIssue::UnknownNodeType {
                node_id: node.id.clone(),
                node_type: node.node_type.clone(),
            });
        }
    }
    report
}

/// Check every connection's endpoints, direction, types and port arity
///
/// Returns `(no_dangling_connections, no_type_violations)`.
fn check_connections(workflow: &Workflow, issues: &mut Vec<ValidationIssue>) -> (bool, bool) {
    let mut no_dangling = true;
    let mut no_violations = true;

    for (index, connection) in workflow.connections().iter().enumerate() {
        match workflow.resolve_connection(connection) {
            Ok(_) => {}
            Err(err @ (GraphError::UnknownNode(_) | GraphError::UnknownPort { .. })) => {
                no_dangling = false;
                issues.push(ValidationIssue::DanglingConnection {
                    index,
                    reason: err.to_string(),
                });
            }
            Err(err) => {
                no_violations = false;
                issues.push(ValidationIssue::TypeViolation {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    for node in workflow.nodes() {
        for port in node.ports() {
            let Some(limit) = port.max_incoming() else {
                continue;
            };
            let count = workflow.incoming_to_port(&node.id, &port.name);
            if count > limit {
                no_violations = false;
                issues.push(ValidationIssue::ArityExceeded {
                    node_id: node.id.clone(),
                    port: port.name.clone(),
                    count,
                    limit,
                });
            }
        }
    }

    (no_dangling, no_violations)
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first search with three-coloring over the connection adjacency
///
/// Roots are tried in node insertion order and successors in connection
/// order, so the witness is reproducible. Stops at the first back-edge and
/// returns the path from the revisited node to the current one.
fn find_cycle(workflow: &Workflow) -> Option<Vec<NodeId>> {
    let ids: Vec<&str> = workflow.nodes().iter().map(|n| n.id.as_str()).collect();
    let edges = workflow
        .connections()
        .iter()
        .map(|c| (c.source_node_id.as_str(), c.target_node_id.as_str()));
    find_cycle_in(&ids, edges)
}

/// Three-color DFS over `ids` in the given order
///
/// Edges whose endpoints are not in `ids` are ignored. Returns the node
/// sequence from the first revisited in-progress node to the current one.
pub(crate) fn find_cycle_in<'a>(
    ids: &[&'a str],
    edges: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Option<Vec<NodeId>> {
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); ids.len()];
    for (source, target) in edges {
        if let (Some(&from), Some(&to)) = (index.get(source), index.get(target)) {
            adjacency[from].push(to);
        }
    }

    let mut colors = vec![Color::Unvisited; ids.len()];
    for root in 0..ids.len() {
        if colors[root] != Color::Unvisited {
            continue;
        }

        // (node, next successor to visit)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        colors[root] = Color::InProgress;

        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            if next < adjacency[node].len() {
                top.1 += 1;
                let succ = adjacency[node][next];
                match colors[succ] {
                    Color::Unvisited => {
                        colors[succ] = Color::InProgress;
                        stack.push((succ, 0));
                    }
                    Color::InProgress => {
                        let start = stack.iter().position(|&(n, _)| n == succ).unwrap_or(0);
                        return Some(stack[start..].iter().map(|&(n, _)| ids[n].to_string()).collect());
                    }
                    Color::Done => {}
                }
            } else {
                colors[node] = Color::Done;
                stack.pop();
            }
        }
    }

    None
}

/// Nodes with no incident connections; a lone node is never isolated
fn isolated_nodes(workflow: &Workflow) -> Vec<NodeId> {
    if workflow.nodes().len() <= 1 {
        return Vec::new();
    }
    workflow
        .nodes()
        .iter()
        .filter(|n| !workflow.connections().iter().any(|c| c.touches(&n.id)))
        .map(|n| n.id.clone())
        .collect()
}
