//! Canonical JSON document
//!
//! The document is the wire form of a workflow: an ordered `nodes` array, an
//! ordered `edges` array and a `metadata` object. Field names are consumed
//! as-is by the remote platform, so they must not change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::types::{Node, NodeCategory, Port, PortDataType, PortValue, Position, WorkflowMetadata};
use crate::workflow::Workflow;

/// Serialized workflow
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDocument {
    pub nodes: Vec<NodeDocument>,
    pub edges: Vec<EdgeDocument>,
    #[serde(default)]
    pub metadata: WorkflowMetadata,
}

/// Serialized node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub category: NodeCategory,
    pub ports: Vec<PortDocument>,
    #[serde(default)]
    pub position: Position,
}

/// Serialized port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDocument {
    pub name: String,
    pub data_type: PortDataType,
    pub is_output: bool,
    #[serde(default)]
    pub value: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    pub multiple: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Serialized connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDocument {
    pub source_node_id: String,
    pub source_port: String,
    pub target_node_id: String,
    pub target_port: String,
}

impl From<&Port> for PortDocument {
    fn from(port: &Port) -> Self {
        Self {
            name: port.name.clone(),
            data_type: port.data_type,
            is_output: port.is_output,
            value: port.value.to_json(),
            multiple: port.multiple,
        }
    }
}

impl From<&Node> for NodeDocument {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            node_type: node.node_type.clone(),
            category: node.category.clone(),
            ports: node.ports().iter().map(PortDocument::from).collect(),
            position: node.position,
        }
    }
}

impl PortDocument {
    fn to_port(&self, location: &str) -> Result<Port> {
        let value = PortValue::from_json(self.data_type, self.value.clone()).ok_or_else(|| {
            GraphError::deserialization(
                location,
                format!("value does not match data type '{}'", self.data_type),
            )
        })?;
        Ok(Port {
            name: self.name.clone(),
            data_type: self.data_type,
            is_output: self.is_output,
            value,
            multiple: self.multiple,
        })
    }
}

impl NodeDocument {
    fn to_node(&self, index: usize) -> Result<Node> {
        let mut node = Node::new(self.id.clone(), self.node_type.clone(), self.category.clone());
        node.position = self.position;
        for port in &self.ports {
            let location = format!("nodes[{}].ports[{}]", index, port.name);
            node.add_port(port.to_port(&location)?)
                .map_err(|e| GraphError::deserialization(&location, e))?;
        }
        Ok(node)
    }
}

/// Encode a workflow, preserving node and connection order
pub fn to_document(workflow: &Workflow) -> WorkflowDocument {
    WorkflowDocument {
        nodes: workflow.nodes().iter().map(NodeDocument::from).collect(),
        edges: workflow
            .connections()
            .iter()
            .map(|c| EdgeDocument {
                source_node_id: c.source_node_id.clone(),
                source_port: c.source_port.clone(),
                target_node_id: c.target_node_id.clone(),
                target_port: c.target_port.clone(),
            })
            .collect(),
        metadata: workflow.metadata().clone(),
    }
}

/// Rebuild a workflow from a document
///
/// Nodes are added first, then every edge goes through [`Workflow::connect`],
/// so the result satisfies every structural invariant. The first violation
/// is reported as `GraphError::Deserialization` naming its location, e.g.
/// `nodes[2]`, `nodes[1].ports[temperature]` or `edges[0]`.
pub fn from_document(document: &WorkflowDocument) -> Result<Workflow> {
    let mut workflow = Workflow::with_metadata(document.metadata.clone());

    for (index, node_doc) in document.nodes.iter().enumerate() {
        let node = node_doc.to_node(index)?;
        workflow
            .add_node(node)
            .map_err(|e| GraphError::deserialization(format!("nodes[{}]", index), e))?;
    }

    for (index, edge) in document.edges.iter().enumerate() {
        workflow
            .connect(
                &edge.source_node_id,
                &edge.source_port,
                &edge.target_node_id,
                &edge.target_port,
            )
            .map_err(|e| GraphError::deserialization(format!("edges[{}]", index), e))?;
    }

    log::debug!(
        "Decoded workflow with {} nodes and {} edges",
        document.nodes.len(),
        document.edges.len()
    );
    Ok(workflow)
}

/// Encode a workflow as pretty-printed JSON text
pub fn to_json(workflow: &Workflow) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_document(workflow))?)
}

/// Decode a workflow from JSON text
pub fn from_json(text: &str) -> Result<Workflow> {
    let document: WorkflowDocument =
        serde_json::from_str(text).map_err(|e| GraphError::deserialization("document", e))?;
    from_document(&document)
}
