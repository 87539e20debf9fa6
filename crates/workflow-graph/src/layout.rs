//! Layered auto-layout
//!
//! Assigns each node a layer equal to its longest-path distance from a
//! source node, orders nodes within each layer with barycenter sweeps to
//! reduce edge crossings, and maps (layer, order) to canvas coordinates.
//! The result depends only on the graph and the options, never on the
//! positions nodes had before, so repeated calls are idempotent.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::constants::layout as defaults;
use crate::error::{GraphError, Result};
use crate::types::Position;
use crate::validation;
use crate::workflow::Workflow;

/// Direction in which layers advance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Left to right
    #[default]
    LR,
    /// Top to bottom
    TB,
    /// Right to left
    RL,
    /// Bottom to top
    BT,
}

impl LayoutDirection {
    /// Flowchart keyword for this direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LR => "LR",
            Self::TB => "TB",
            Self::RL => "RL",
            Self::BT => "BT",
        }
    }

    /// Map primary (layer) and cross (order) offsets to a position
    fn place(&self, primary: f64, cross: f64) -> Position {
        match self {
            Self::LR => Position::new(primary, cross),
            Self::RL => Position::new(0.0 - primary, cross),
            Self::TB => Position::new(cross, primary),
            Self::BT => Position::new(cross, 0.0 - primary),
        }
    }
}

/// Layout options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    /// Distance between neighbouring nodes within a layer
    pub node_spacing: f64,
    /// Distance between consecutive layers
    pub layer_spacing: f64,
    /// Number of forward/backward barycenter sweep pairs
    pub sweeps: usize,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::default(),
            node_spacing: defaults::NODE_SPACING,
            layer_spacing: defaults::LAYER_SPACING,
            sweeps: defaults::SWEEPS,
        }
    }
}

impl LayoutOptions {
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }
}

/// Lay out a workflow, mutating only node positions
///
/// Fails with `GraphError::Layout` carrying the cycle witness if the graph
/// is not acyclic.
pub fn layout(workflow: &mut Workflow, options: &LayoutOptions) -> Result<()> {
    let report = validation::check(workflow);
    if let Some(witness) = report.cycle_witness {
        return Err(GraphError::Layout { witness });
    }

    let graph = IndexedGraph::new(workflow);
    let layer_of = graph.assign_layers();
    let layers = graph.order_layers(&layer_of, options.sweeps);

    let mut positions = vec![Position::default(); graph.len()];
    for (layer, members) in layers.iter().enumerate() {
        for (order, &node) in members.iter().enumerate() {
            positions[node] = options.direction.place(
                layer as f64 * options.layer_spacing,
                order as f64 * options.node_spacing,
            );
        }
    }

    for (node, position) in workflow.nodes_mut().iter_mut().zip(positions) {
        node.position = position;
    }

    log::debug!(
        "Laid out {} nodes in {} layers ({})",
        graph.len(),
        layers.len(),
        options.direction.as_str()
    );
    Ok(())
}

/// Workflow adjacency over node insertion indices
struct IndexedGraph {
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl IndexedGraph {
    fn new(workflow: &Workflow) -> Self {
        let index: HashMap<&str, usize> = workflow
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.as_str(), i))
            .collect();

        let count = workflow.nodes().len();
        let mut successors = vec![Vec::new(); count];
        let mut predecessors = vec![Vec::new(); count];
        for connection in workflow.connections() {
            if let (Some(&from), Some(&to)) = (
                index.get(connection.source_node_id.as_str()),
                index.get(connection.target_node_id.as_str()),
            ) {
                successors[from].push(to);
                predecessors[to].push(from);
            }
        }

        Self {
            successors,
            predecessors,
        }
    }

    fn len(&self) -> usize {
        self.successors.len()
    }

    /// Longest-path layering in topological (Kahn) order
    fn assign_layers(&self) -> Vec<usize> {
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.len()).filter(|&n| in_degree[n] == 0).collect();
        let mut layer_of = vec![0usize; self.len()];

        while let Some(node) = queue.pop_front() {
            for &succ in &self.successors[node] {
                layer_of[succ] = layer_of[succ].max(layer_of[node] + 1);
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    queue.push_back(succ);
                }
            }
        }

        layer_of
    }

    /// Group nodes by layer and reduce crossings with barycenter sweeps
    ///
    /// Each layer starts in insertion order. A forward sweep orders layer
    /// `i` by the mean order of its predecessors in layer `i - 1`, a backward
    /// sweep by its successors in layer `i + 1`. Nodes without neighbours in
    /// the adjacent layer keep their current order as barycenter; ties fall
    /// back to insertion order.
    fn order_layers(&self, layer_of: &[usize], sweeps: usize) -> Vec<Vec<usize>> {
        let layer_count = layer_of.iter().max().map_or(0, |&max| max + 1);
        let mut layers: Vec<Vec<usize>> = vec![Vec::new(); layer_count];
        for (node, &layer) in layer_of.iter().enumerate() {
            layers[layer].push(node);
        }

        for _ in 0..sweeps {
            for li in 1..layer_count {
                let (done, rest) = layers.split_at_mut(li);
                reorder(&mut rest[0], &done[li - 1], &self.predecessors);
            }
            for li in (0..layer_count.saturating_sub(1)).rev() {
                let (head, tail) = layers.split_at_mut(li + 1);
                reorder(&mut head[li], &tail[0], &self.successors);
            }
        }

        layers
    }
}

/// Sort `layer` by the barycenter of each node's neighbours in `fixed`
fn reorder(layer: &mut Vec<usize>, fixed: &[usize], neighbours: &[Vec<usize>]) {
    let fixed_order: HashMap<usize, f64> = fixed
        .iter()
        .enumerate()
        .map(|(order, &node)| (node, order as f64))
        .collect();

    let mut scored: Vec<(f64, usize)> = layer
        .iter()
        .enumerate()
        .map(|(current, &node)| {
            let orders: Vec<f64> = neighbours[node]
                .iter()
                .filter_map(|n| fixed_order.get(n).copied())
                .collect();
            let barycenter = if orders.is_empty() {
                current as f64
            } else {
                orders.iter().sum::<f64>() / orders.len() as f64
            };
            (barycenter, node)
        })
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    *layer = scored.into_iter().map(|(_, node)| node).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Node, NodeCategory, Port, PortDataType};

    fn pass_node(id: &str) -> Node {
        let mut node = Node::new(id, "Pass", NodeCategory::Tools);
        node.add_port(Port::input("in", PortDataType::Any).multiple()).unwrap();
        node.add_port(Port::output("out", PortDataType::Any)).unwrap();
        node
    }

    fn workflow_of(ids: &[&str], edges: &[(&str, &str)]) -> Workflow {
        let mut workflow = Workflow::new();
        for id in ids {
            workflow.add_node(pass_node(id)).unwrap();
        }
        for (from, to) in edges {
            workflow.connect(from, "out", to, "in").unwrap();
        }
        workflow
    }

    fn position(workflow: &Workflow, id: &str) -> Position {
        workflow.node(id).unwrap().position
    }

    #[test]
    fn test_layers_follow_longest_path() {
        // a -> b -> c and a -> c: c sits two layers after a
        let mut workflow = workflow_of(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        workflow.layout(&LayoutOptions::default()).unwrap();

        assert_eq!(position(&workflow, "a").x, 0.0);
        assert_eq!(position(&workflow, "b").x, 200.0);
        assert_eq!(position(&workflow, "c").x, 400.0);
    }

    #[test]
    fn test_directions_map_axes() {
        let base = workflow_of(&["a", "b"], &[("a", "b")]);
        let cases = [
            (LayoutDirection::LR, Position::new(200.0, 0.0)),
            (LayoutDirection::RL, Position::new(-200.0, 0.0)),
            (LayoutDirection::TB, Position::new(0.0, 200.0)),
            (LayoutDirection::BT, Position::new(0.0, -200.0)),
        ];
        for (direction, expected) in cases {
            let mut workflow = base.clone();
            workflow
                .layout(&LayoutOptions::default().with_direction(direction))
                .unwrap();
            assert_eq!(position(&workflow, "b"), expected, "{:?}", direction);
            assert_eq!(position(&workflow, "a"), Position::new(0.0, 0.0));
        }
    }

    #[test]
    fn test_barycenter_uncrosses_edges() {
        // Sources a, b; targets inserted in crossing order: y <- a, x <- b
        let mut workflow = workflow_of(&["a", "b", "x", "y"], &[("b", "x"), ("a", "y")]);
        workflow.layout(&LayoutOptions::default()).unwrap();

        assert!(position(&workflow, "a").y < position(&workflow, "b").y);
        assert!(position(&workflow, "y").y < position(&workflow, "x").y);
    }

    #[test]
    fn test_layout_is_idempotent() {
        let mut workflow = workflow_of(
            &["a", "b", "c", "d", "e"],
            &[("a", "c"), ("b", "c"), ("c", "d"), ("a", "e"), ("b", "d")],
        );
        let options = LayoutOptions::default();
        workflow.layout(&options).unwrap();
        let first: Vec<(u64, u64)> = workflow
            .nodes()
            .iter()
            .map(|n| (n.position.x.to_bits(), n.position.y.to_bits()))
            .collect();

        workflow.layout(&options).unwrap();
        let second: Vec<(u64, u64)> = workflow
            .nodes()
            .iter()
            .map(|n| (n.position.x.to_bits(), n.position.y.to_bits()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_layout_rejects_cycles() {
        let mut workflow = workflow_of(&["a", "b"], &[("a", "b"), ("b", "a")]);
        workflow.set_position("a", Position::new(5.0, 5.0)).unwrap();

        let err = workflow.layout(&LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, GraphError::Layout { ref witness } if witness.len() == 2));
        assert_eq!(position(&workflow, "a"), Position::new(5.0, 5.0));
    }

    #[test]
    fn test_isolated_nodes_stack_in_first_layer() {
        let mut workflow = workflow_of(&["a", "b", "c"], &[]);
        workflow.layout(&LayoutOptions::default()).unwrap();
        assert_eq!(position(&workflow, "a"), Position::new(0.0, 0.0));
        assert_eq!(position(&workflow, "b"), Position::new(0.0, 300.0));
        assert_eq!(position(&workflow, "c"), Position::new(0.0, 600.0));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: LayoutOptions =
            serde_json::from_str(r#"{"direction": "TB", "node_spacing": 150}"#).unwrap();
        assert_eq!(options.direction, LayoutDirection::TB);
        assert_eq!(options.node_spacing, 150.0);
        assert_eq!(options.layer_spacing, 200.0);
        assert_eq!(options.sweeps, 4);
    }
}
