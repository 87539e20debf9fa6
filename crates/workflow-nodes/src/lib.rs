//! Workflow Nodes
//!
//! Built-in node kind catalog for the workflow graph engine.
//! Each kind is a unit type whose descriptor declares its type tag,
//! category and default ports; the behaviour itself runs remotely.
//!
//! # Categories
//!
//! - **Text processing**: text input, templates, splitting, extraction
//! - **LLMs**: chat completion models
//! - **Outputs**: text and table display
//! - **Tools**: user code execution
//! - **File processing**: uploads and document parsing
//! - **Media**: image generation and watermarking
//! - **Control flows**: conditionals and branch merges
//! - **Web crawlers**, **Triggers**

pub mod control_flows;
pub mod file_processing;
pub mod llms;
pub mod media;
pub mod outputs;
pub mod text_processing;
pub mod tools;
pub mod triggers;
pub mod web_crawlers;

// Re-export all kinds for convenience
pub use control_flows::*;
pub use file_processing::*;
pub use llms::{Claude, Deepseek, OpenAI};
pub use media::*;
pub use outputs::*;
pub use text_processing::*;
pub use tools::*;
pub use triggers::*;
pub use web_crawlers::*;

use workflow_graph::NodeRegistry;

/// Registry of every built-in node kind
pub fn builtin_registry() -> NodeRegistry {
    let registry = NodeRegistry::with_builtins();
    log::debug!("Built-in catalog: {}", registry.node_types().join(", "));
    registry
}
