//! Error types for the workflow graph engine

use thiserror::Error;

use crate::types::{NodeId, PortDataType};

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building, laying out or decoding a workflow
///
/// Mutation errors are raised before any state changes, so a failed call
/// always leaves the workflow exactly as it was.
#[derive(Debug, Error)]
pub enum GraphError {
    /// A node with this id already exists
    #[error("Duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A port with this name already exists on the node
    #[error("Duplicate port '{port}' on node '{node_id}'")]
    DuplicatePort { node_id: NodeId, port: String },

    /// No node with this id exists
    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    /// The node exists but has no port with this name
    #[error("Unknown port '{port}' on node '{node_id}'")]
    UnknownPort { node_id: NodeId, port: String },

    /// The node type tag is not registered
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Removing the node would leave connections pointing at nothing
    #[error("Node '{node_id}' still has {count} dependent connection(s)")]
    DanglingConnections { node_id: NodeId, count: usize },

    /// The exact same connection already exists
    #[error("Duplicate connection: {0}")]
    DuplicateConnection(String),

    /// No connection matches the given endpoints
    #[error("Connection not found: {0}")]
    ConnectionNotFound(String),

    /// A connection endpoint uses a port in the wrong direction
    #[error("Port '{port}' on node '{node_id}' is not an {expected} port")]
    PortDirection {
        node_id: NodeId,
        port: String,
        expected: &'static str,
    },

    /// The target input port already holds its maximum connections
    #[error("Input port '{port}' on node '{node_id}' already has {limit} connection(s)")]
    ArityViolation {
        node_id: NodeId,
        port: String,
        limit: usize,
    },

    /// The data type tags of the two endpoints are incompatible
    #[error("Type mismatch: {source_type} cannot connect to {target_type}")]
    TypeMismatch {
        source_type: PortDataType,
        target_type: PortDataType,
    },

    /// A port value does not match the port's declared data type
    #[error("Invalid value for port '{port}' on node '{node_id}': expected {expected}")]
    InvalidValue {
        node_id: NodeId,
        port: String,
        expected: PortDataType,
    },

    /// Layout was requested on a graph that contains a cycle
    #[error("Layout requires an acyclic graph; cycle through {}", .witness.join(" -> "))]
    Layout { witness: Vec<NodeId> },

    /// A document could not be turned back into a workflow
    #[error("Deserialization error at {location}: {reason}")]
    Deserialization { location: String, reason: String },

    /// JSON encoding failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot compression failure
    #[error("Compression error: {0}")]
    Compression(String),

    /// The document sink rejected or could not serve a request
    #[error("Document sink error: {0}")]
    Sink(String),
}

impl GraphError {
    /// Create a deserialization error for a location in the document
    pub fn deserialization(location: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Deserialization {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error is a structural usage error raised by a mutation
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::DuplicateNode(_)
                | Self::DuplicatePort { .. }
                | Self::UnknownNode(_)
                | Self::UnknownPort { .. }
                | Self::UnknownNodeType(_)
                | Self::DanglingConnections { .. }
                | Self::DuplicateConnection(_)
                | Self::ConnectionNotFound(_)
                | Self::PortDirection { .. }
                | Self::ArityViolation { .. }
        )
    }
}
