//! Node kind descriptor trait and metadata types
//!
//! This module provides the `NodeKind` trait that lets each node kind
//! self-describe its type tag, category and default ports. Descriptors are
//! plain static data: the behaviour of a node runs on the remote platform
//! and is never modelled here.

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::types::{Node, NodeCategory, Port, PortDataType, PortValue};

/// Trait for node kinds that can describe their ports
///
/// # Example
///
/// ```ignore
/// use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};
///
/// pub struct Echo;
///
/// impl NodeKind for Echo {
///     fn descriptor() -> NodeDescriptor {
///         NodeDescriptor::new("Echo", NodeCategory::Tools, "Echo", "Repeats its input")
///             .with_port(PortSpec::input("text", PortDataType::Text))
///             .with_port(PortSpec::output("output", PortDataType::Text))
///     }
/// }
///
/// inventory::submit!(workflow_graph::DescriptorFn(Echo::descriptor));
/// ```
pub trait NodeKind {
    /// Get the static descriptor for this node kind
    fn descriptor() -> NodeDescriptor
    where
        Self: Sized;
}

/// Link-time registration handle for a node kind descriptor
///
/// Collected by [`NodeRegistry::with_builtins`](crate::NodeRegistry::with_builtins).
pub struct DescriptorFn(pub fn() -> NodeDescriptor);

inventory::collect!(DescriptorFn);

/// Complete description of a node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    /// Unique type tag (e.g., "TemplateCompose")
    pub node_type: String,
    /// Category for grouping
    pub category: NodeCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the node does on the remote platform
    pub description: String,
    /// Default ports in declaration order
    pub ports: Vec<PortSpec>,
}

impl NodeDescriptor {
    pub fn new(
        node_type: impl Into<String>,
        category: NodeCategory,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            node_type: node_type.into(),
            category,
            label: label.into(),
            description: description.into(),
            ports: Vec::new(),
        }
    }

    /// Append a default port
    pub fn with_port(mut self, port: PortSpec) -> Self {
        self.ports.push(port);
        self
    }

    /// Find a port spec by name
    pub fn port(&self, name: &str) -> Option<&PortSpec> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Build a node with this descriptor's default ports and values
    pub fn instantiate(&self, id: impl Into<String>) -> Result<Node> {
        let mut node = Node::new(id, self.node_type.clone(), self.category.clone());
        for spec in &self.ports {
            let port = spec.to_port(&node.id)?;
            node.add_port(port)?;
        }
        Ok(node)
    }
}

/// Declaration of a default port on a node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSpec {
    /// Port name
    pub name: String,
    /// Data type tag
    pub data_type: PortDataType,
    /// Whether this is an output port
    pub is_output: bool,
    /// Whether multiple incoming connections are allowed
    pub multiple: bool,
    /// Default value assigned on instantiation
    pub default_value: Option<serde_json::Value>,
}

impl PortSpec {
    /// Declare an input port
    pub fn input(name: impl Into<String>, data_type: PortDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_output: false,
            multiple: false,
            default_value: None,
        }
    }

    /// Declare an output port
    pub fn output(name: impl Into<String>, data_type: PortDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_output: true,
            multiple: false,
            default_value: None,
        }
    }

    /// Set this port to accept multiple connections
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Set a default value for this port
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// The default as a typed port value
    pub fn default_port_value(&self) -> Option<PortValue> {
        match &self.default_value {
            None => Some(PortValue::Empty),
            Some(value) => PortValue::from_json(self.data_type, value.clone()),
        }
    }

    /// Build a port for the given node from this spec
    pub fn to_port(&self, node_id: &str) -> Result<Port> {
        let value = self
            .default_port_value()
            .ok_or_else(|| GraphError::InvalidValue {
                node_id: node_id.to_string(),
                port: self.name.clone(),
                expected: self.data_type,
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn llm_descriptor() -> NodeDescriptor {
        NodeDescriptor::new("OpenAI", NodeCategory::Llms, "OpenAI", "Chat completion")
            .with_port(PortSpec::input("prompt", PortDataType::Text))
            .with_port(PortSpec::input("temperature", PortDataType::Number).with_default(0.7))
            .with_port(PortSpec::output("output", PortDataType::Text))
    }

    #[test]
    fn test_port_spec_builders() {
        let port = PortSpec::input("files", PortDataType::List).multiple();
        assert!(!port.is_output);
        assert!(port.multiple);
        assert!(port.default_value.is_none());
        assert_eq!(port.default_port_value(), Some(PortValue::Empty));
    }

    #[test]
    fn test_instantiate_applies_defaults() {
        let node = llm_descriptor().instantiate("llm").unwrap();
        assert_eq!(node.id, "llm");
        assert_eq!(node.category, NodeCategory::Llms);
        assert_eq!(node.ports().len(), 3);
        assert_eq!(
            node.port("temperature").unwrap().value.to_json(),
            json!(0.7)
        );
        assert!(node.port("output").unwrap().is_output);
    }

    #[test]
    fn test_instantiate_rejects_bad_default() {
        let descriptor = NodeDescriptor::new("Bad", NodeCategory::Tools, "Bad", "")
            .with_port(PortSpec::input("flag", PortDataType::Boolean).with_default("yes"));
        let err = descriptor.instantiate("b").unwrap_err();
        assert!(matches!(err, GraphError::InvalidValue { .. }));
    }

    #[test]
    fn test_descriptor_serialization() {
        let json = serde_json::to_string(&llm_descriptor()).unwrap();
        assert!(json.contains("nodeType")); // camelCase
        assert!(json.contains("\"category\":\"llms\""));
    }
}
