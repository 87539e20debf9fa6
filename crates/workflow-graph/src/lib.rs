//! Workflow Graph - typed workflow IR for remote pipeline platforms
//!
//! This crate builds, checks and represents the definition of a workflow
//! that a remote platform executes. It supports:
//!
//! - Typed nodes, ports and connections with atomic structural mutation
//! - On-demand validation (cycles, isolation, dangling or mistyped edges)
//! - Deterministic layered auto-layout
//! - JSON document and flowchart diagram codecs
//! - Builder code generation and bounded structural summaries
//! - Compressed snapshot-based undo/redo
//!
//! No node behaviour runs here. Submitting a workflow goes through a
//! caller-provided [`DocumentSink`].
//!
//! # Architecture
//!
//! - `Workflow`: the graph and its mutations
//! - `NodeRegistry`: explicit type tag to descriptor mapping, passed where needed
//! - `codec`: `WorkflowDocument` and diagram translators
//! - `WorkflowHistory`: compressed immutable snapshots for undo/redo
//!
//! # Example
//!
//! ```ignore
//! use workflow_graph::{LayoutOptions, NodeRegistry, Workflow};
//!
//! let registry = NodeRegistry::with_builtins();
//! let mut workflow = Workflow::new();
//! workflow.add_node(registry.create_node("TextInOut", "input")?)?;
//! workflow.add_node(registry.create_node("OpenAI", "llm")?)?;
//! workflow.connect("input", "output", "llm", "prompt")?;
//! workflow.layout(&LayoutOptions::default())?;
//! println!("{}", workflow_graph::codec::to_diagram(&workflow));
//! ```

pub mod analysis;
pub mod codec;
pub mod codegen;
pub mod config;
pub mod constants;
pub mod descriptor;
pub mod error;
pub mod history;
pub mod layout;
pub mod registry;
pub mod sink;
pub mod types;
pub mod validation;
pub mod workflow;

// Re-export key types
pub use analysis::{analyse, analyse_json, format_for_llm, AnalysisConfig, AnalysisResult};
pub use codec::{DiagramOptions, DiagramOutline, WorkflowDocument};
pub use codegen::{generate, generate_source, GeneratedProgram, Statement};
pub use config::{ConfigError, EngineConfig};
pub use descriptor::{DescriptorFn, NodeDescriptor, NodeKind, PortSpec};
pub use error::{GraphError, Result};
pub use history::{HistoryConfig, WorkflowHistory};
pub use layout::{LayoutDirection, LayoutOptions};
pub use registry::NodeRegistry;
pub use sink::{DocumentSink, MemoryDocumentSink};
pub use types::{
    Connection, Node, NodeCategory, NodeId, Port, PortDataType, PortValue, Position,
    WorkflowMetadata,
};
pub use validation::{ValidationIssue, ValidationReport};
pub use workflow::Workflow;

// Re-export inventory so node crates submit descriptors against the same version
pub use inventory;
