//! Translators between the graph model and its external formats
//!
//! - [`document`]: the canonical JSON document exchanged with the remote platform
//! - [`diagram`]: flowchart markup for rendering and inspection

pub mod diagram;
pub mod document;

pub use diagram::{parse_diagram, to_diagram, to_diagram_with, DiagramOptions, DiagramOutline};
pub use document::{
    from_document, from_json, to_document, to_json, EdgeDocument, NodeDocument, PortDocument,
    WorkflowDocument,
};
