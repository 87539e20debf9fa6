//! The workflow graph and its structural mutations
//!
//! A [`Workflow`] owns its nodes (kept in insertion order), its connections
//! (kept in declaration order) and its metadata. Every mutation checks its
//! preconditions before touching any state, so a failed call leaves the
//! graph unchanged. Cycles are allowed while a graph is being built; they
//! are reported by [`Workflow::check`] rather than rejected here.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{GraphError, Result};
use crate::layout::{self, LayoutOptions};
use crate::registry::NodeRegistry;
use crate::types::{Connection, Node, NodeId, Port, Position, WorkflowMetadata};
use crate::validation::{self, ValidationReport};

/// A complete workflow graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workflow {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    metadata: WorkflowMetadata,
}

impl Workflow {
    /// Create a new empty workflow with default metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty workflow with the given metadata
    pub fn with_metadata(metadata: WorkflowMetadata) -> Self {
        Self {
            metadata,
            ..Self::default()
        }
    }

    pub fn metadata(&self) -> &WorkflowMetadata {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: WorkflowMetadata) {
        self.metadata = metadata;
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Connections in declaration order
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Find a node by ID
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Insertion index of a node
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    fn node_mut(&mut self, id: &str) -> Result<&mut Node> {
        self.nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    /// Add a node, failing if its id is already taken
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.node(&node.id).is_some() {
            return Err(GraphError::DuplicateNode(node.id));
        }
        log::debug!("Adding node '{}' ({})", node.id, node.node_type);
        self.nodes.push(node);
        Ok(())
    }

    /// Add several nodes at once
    ///
    /// Either every node is added or, on the first duplicate id, none are.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = Node>) -> Result<()> {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        let mut seen: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        for node in &nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        for node in nodes {
            self.add_node(node)?;
        }
        Ok(())
    }

    /// Remove a node
    ///
    /// Fails with `DanglingConnections` if any connection touches the node,
    /// unless `cascade` is set, in which case those connections are removed too.
    pub fn remove_node(&mut self, id: &str, cascade: bool) -> Result<Node> {
        let index = self
            .node_index(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;

        let dependent = self.connections.iter().filter(|c| c.touches(id)).count();
        if dependent > 0 {
            if !cascade {
                return Err(GraphError::DanglingConnections {
                    node_id: id.to_string(),
                    count: dependent,
                });
            }
            self.connections.retain(|c| !c.touches(id));
            log::debug!("Removed {} connection(s) of node '{}'", dependent, id);
        }

        log::debug!("Removing node '{}'", id);
        Ok(self.nodes.remove(index))
    }

    /// Add a port to an existing node
    pub fn add_port(&mut self, node_id: &str, port: Port) -> Result<()> {
        self.node_mut(node_id)?.add_port(port)
    }

    /// Assign a value to a port, checked against the port's data type
    pub fn set_port_value(
        &mut self,
        node_id: &str,
        port: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.node_mut(node_id)?.set_port_value(port, value)
    }

    /// Move a node
    pub fn set_position(&mut self, node_id: &str, position: Position) -> Result<()> {
        self.node_mut(node_id)?.position = position;
        Ok(())
    }

    /// Connect an output port to an input port
    ///
    /// Fails with `UnknownNode`/`UnknownPort` if an endpoint does not exist,
    /// `PortDirection` if the ports are not output -> input, `TypeMismatch`
    /// if the data types are incompatible, `DuplicateConnection` if the edge
    /// exists already, and `ArityViolation` if the target input is full.
    pub fn connect(
        &mut self,
        source_node_id: &str,
        source_port: &str,
        target_node_id: &str,
        target_port: &str,
    ) -> Result<()> {
        let connection = Connection::new(source_node_id, source_port, target_node_id, target_port);
        let (_, target) = self.resolve_connection(&connection)?;

        if self.connections.contains(&connection) {
            return Err(GraphError::DuplicateConnection(connection.to_string()));
        }

        if let Some(limit) = target.max_incoming() {
            if self.incoming_to_port(target_node_id, target_port) >= limit {
                return Err(GraphError::ArityViolation {
                    node_id: target_node_id.to_string(),
                    port: target_port.to_string(),
                    limit,
                });
            }
        }

        log::debug!("Connecting {}", connection);
        self.connections.push(connection);
        Ok(())
    }

    /// Remove a connection, returning it
    pub fn disconnect(
        &mut self,
        source_node_id: &str,
        source_port: &str,
        target_node_id: &str,
        target_port: &str,
    ) -> Result<Connection> {
        let connection = Connection::new(source_node_id, source_port, target_node_id, target_port);
        let index = self
            .connections
            .iter()
            .position(|c| *c == connection)
            .ok_or_else(|| GraphError::ConnectionNotFound(connection.to_string()))?;

        log::debug!("Disconnecting {}", connection);
        Ok(self.connections.remove(index))
    }

    /// Resolve both endpoints and check direction and type compatibility
    ///
    /// Arity is not checked here since it depends on the other connections.
    pub(crate) fn resolve_connection(&self, connection: &Connection) -> Result<(&Port, &Port)> {
        let source_node = self
            .node(&connection.source_node_id)
            .ok_or_else(|| GraphError::UnknownNode(connection.source_node_id.clone()))?;
        let target_node = self
            .node(&connection.target_node_id)
            .ok_or_else(|| GraphError::UnknownNode(connection.target_node_id.clone()))?;

        let source = source_node
            .port(&connection.source_port)
            .ok_or_else(|| GraphError::UnknownPort {
                node_id: source_node.id.clone(),
                port: connection.source_port.clone(),
            })?;
        let target = target_node
            .port(&connection.target_port)
            .ok_or_else(|| GraphError::UnknownPort {
                node_id: target_node.id.clone(),
                port: connection.target_port.clone(),
            })?;

        if !source.is_output {
            return Err(GraphError::PortDirection {
                node_id: source_node.id.clone(),
                port: source.name.clone(),
                expected: "output",
            });
        }
        if target.is_output {
            return Err(GraphError::PortDirection {
                node_id: target_node.id.clone(),
                port: target.name.clone(),
                expected: "input",
            });
        }

        if !source.data_type.is_compatible_with(&target.data_type) {
            return Err(GraphError::TypeMismatch {
                source_type: source.data_type,
                target_type: target.data_type,
            });
        }

        Ok((source, target))
    }

    /// Number of connections ending at the given input port
    pub fn incoming_to_port(&self, node_id: &str, port: &str) -> usize {
        self.connections
            .iter()
            .filter(|c| c.target_node_id == node_id && c.target_port == port)
            .count()
    }

    /// Get connections coming into a node
    pub fn incoming<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.target_node_id == node_id)
    }

    /// Get connections going out of a node
    pub fn outgoing<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections.iter().filter(move |c| c.source_node_id == node_id)
    }

    /// Get the IDs of nodes that this node depends on (upstream nodes)
    pub fn dependencies(&self, node_id: &str) -> Vec<NodeId> {
        self.incoming(node_id)
            .map(|c| c.source_node_id.clone())
            .collect()
    }

    /// Get the IDs of nodes that depend on this node (downstream nodes)
    pub fn dependents(&self, node_id: &str) -> Vec<NodeId> {
        self.outgoing(node_id)
            .map(|c| c.target_node_id.clone())
            .collect()
    }

    /// Compute the structural validation report
    pub fn check(&self) -> ValidationReport {
        validation::check(self)
    }

    /// Compute the validation report, also flagging unregistered node types
    pub fn check_with_registry(&self, registry: &NodeRegistry) -> ValidationReport {
        validation::check_with_registry(self, registry)
    }

    /// Assign layered coordinates to every node
    pub fn layout(&mut self, options: &LayoutOptions) -> Result<()> {
        layout::layout(self, options)
    }
}
