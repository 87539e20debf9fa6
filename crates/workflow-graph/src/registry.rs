//! Node type registry
//!
//! Maps node type tags to their descriptors. A registry is an explicit value
//! built once (usually via [`NodeRegistry::with_builtins`]) and passed to
//! whichever component needs descriptor lookups: node construction,
//! registry-aware validation and code generation.
//!
//! # Usage
//!
//! ```ignore
//! use workflow_graph::NodeRegistry;
//!
//! let registry = NodeRegistry::with_builtins();
//! let llm = registry.create_node("OpenAI", "llm")?;
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::descriptor::{DescriptorFn, NodeDescriptor};
use crate::error::{GraphError, Result};
use crate::types::{Node, NodeCategory};

/// Registry of node kinds keyed by type tag
///
/// # Composability
///
/// Registries can be composed by merging:
/// ```ignore
/// let mut registry = NodeRegistry::with_builtins();
/// registry.merge(plugin_registry);
/// ```
pub struct NodeRegistry {
    entries: HashMap<String, NodeDescriptor>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Create a registry holding every descriptor submitted via `inventory`
    ///
    /// Only descriptors from crates linked into the final binary are seen.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor_fn in inventory::iter::<DescriptorFn> {
            registry.register((descriptor_fn.0)());
        }
        log::debug!("Node registry loaded {} built-in kinds", registry.len());
        registry
    }

    /// Register a node kind, replacing any previous entry with the same tag
    pub fn register(&mut self, descriptor: NodeDescriptor) {
        if let Some(previous) = self
            .entries
            .insert(descriptor.node_type.clone(), descriptor)
        {
            log::warn!("Node type '{}' registered twice; keeping the latest", previous.node_type);
        }
    }

    /// Get the descriptor for a node type
    pub fn get(&self, node_type: &str) -> Option<&NodeDescriptor> {
        self.entries.get(node_type)
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.entries.contains_key(node_type)
    }

    /// All registered type tags, sorted
    pub fn node_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(|s| s.as_str()).collect();
        types.sort_unstable();
        types
    }

    /// Descriptors grouped by category, each group sorted by type tag
    pub fn descriptors_by_category(&self) -> BTreeMap<NodeCategory, Vec<&NodeDescriptor>> {
        let mut grouped: BTreeMap<NodeCategory, Vec<&NodeDescriptor>> = BTreeMap::new();
        for descriptor in self.entries.values() {
            grouped
                .entry(descriptor.category.clone())
                .or_default()
                .push(descriptor);
        }
        for group in grouped.values_mut() {
            group.sort_by(|a, b| a.node_type.cmp(&b.node_type));
        }
        grouped
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another registry into this one
    ///
    /// Entries from `other` override entries in `self` if they share the same tag.
    pub fn merge(&mut self, other: NodeRegistry) {
        self.entries.extend(other.entries);
    }

    /// Instantiate a node of the given type with its default ports
    pub fn create_node(&self, node_type: &str, id: impl Into<String>) -> Result<Node> {
        let descriptor = self
            .get(node_type)
            .ok_or_else(|| GraphError::UnknownNodeType(node_type.to_string()))?;
        descriptor.instantiate(id)
    }

    /// Instantiate a node with a freshly generated UUID v4 id
    pub fn create_node_with_generated_id(&self, node_type: &str) -> Result<Node> {
        self.create_node(node_type, uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRegistry")
            .field("node_types", &self.node_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PortSpec;
    use crate::types::PortDataType;

    fn test_descriptor(node_type: &str, category: NodeCategory) -> NodeDescriptor {
        NodeDescriptor::new(node_type, category, format!("Test {}", node_type), "Test node")
            .with_port(PortSpec::input("input", PortDataType::Text))
            .with_port(PortSpec::output("output", PortDataType::Text))
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = NodeRegistry::new();
        registry.register(test_descriptor("test-node", NodeCategory::Tools));

        assert!(registry.has_node_type("test-node"));
        assert!(!registry.has_node_type("unknown"));
        assert_eq!(registry.get("test-node").unwrap().label, "Test test-node");
    }

    #[test]
    fn test_node_types_sorted() {
        let mut registry = NodeRegistry::new();
        registry.register(test_descriptor("b", NodeCategory::Tools));
        registry.register(test_descriptor("a", NodeCategory::Tools));
        registry.register(test_descriptor("c", NodeCategory::Llms));
        assert_eq!(registry.node_types(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_override() {
        let mut registry1 = NodeRegistry::new();
        let mut meta1 = test_descriptor("node-a", NodeCategory::Tools);
        meta1.label = "Original".to_string();
        registry1.register(meta1);

        let mut registry2 = NodeRegistry::new();
        let mut meta2 = test_descriptor("node-a", NodeCategory::Tools);
        meta2.label = "Override".to_string();
        registry2.register(meta2);
        registry2.register(test_descriptor("node-b", NodeCategory::Tools));

        registry1.merge(registry2);
        assert_eq!(registry1.len(), 2);
        assert_eq!(registry1.get("node-a").unwrap().label, "Override");
    }

    #[test]
    fn test_descriptors_by_category() {
        let mut registry = NodeRegistry::new();
        registry.register(test_descriptor("TextInOut", NodeCategory::TextProcessing));
        registry.register(test_descriptor("OpenAI", NodeCategory::Llms));
        registry.register(test_descriptor("Claude", NodeCategory::Llms));

        let grouped = registry.descriptors_by_category();
        let llms: Vec<&str> = grouped[&NodeCategory::Llms]
            .iter()
            .map(|d| d.node_type.as_str())
            .collect();
        assert_eq!(llms, vec!["Claude", "OpenAI"]);
        assert_eq!(grouped[&NodeCategory::TextProcessing].len(), 1);
    }

    #[test]
    fn test_create_node() {
        let mut registry = NodeRegistry::new();
        registry.register(test_descriptor("echo", NodeCategory::Tools));

        let node = registry.create_node("echo", "echo-1").unwrap();
        assert_eq!(node.id, "echo-1");
        assert_eq!(node.ports().len(), 2);

        let err = registry.create_node("missing", "x").unwrap_err();
        assert!(matches!(err, GraphError::UnknownNodeType(t) if t == "missing"));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let mut registry = NodeRegistry::new();
        registry.register(test_descriptor("echo", NodeCategory::Tools));

        let a = registry.create_node_with_generated_id("echo").unwrap();
        let b = registry.create_node_with_generated_id("echo").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.len(), 36);
    }
}
