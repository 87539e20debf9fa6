//! Builder code generation
//!
//! Turns a [`WorkflowDocument`] into a [`GeneratedProgram`]: an ordered list
//! of builder statements that, run against a fresh [`Workflow`], rebuild a
//! workflow structurally equal to the document. The program can be rendered
//! as Rust source or executed directly.
//!
//! Statement order is fixed: every node declaration (with its extra ports
//! and non-default values) comes first, in document order, followed by every
//! connection in document order. Edges are never assumed to be sorted.

use std::fmt::Write as _;

use serde_json::Value;

use crate::codec::{from_document, EdgeDocument, NodeDocument, PortDocument, WorkflowDocument};
use crate::descriptor::NodeDescriptor;
use crate::error::Result;
use crate::registry::NodeRegistry;
use crate::types::{Node, NodeCategory, Port, WorkflowMetadata};
use crate::workflow::Workflow;

/// A single builder call
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Instantiate a registered node kind with its default ports
    CreateNode { node_type: String, id: String },
    /// Declare a node without ports, for kinds the registry cannot build as-is
    DeclareNode {
        id: String,
        node_type: String,
        category: NodeCategory,
    },
    /// Append a port to a declared node
    AddPort { node_id: String, port: PortDocument },
    /// Assign a non-default port value
    SetValue {
        node_id: String,
        port: String,
        value: Value,
    },
    /// Connect two ports
    Connect(EdgeDocument),
}

/// Builder statements for one workflow
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedProgram {
    pub metadata: WorkflowMetadata,
    pub statements: Vec<Statement>,
}

/// Generate builder statements for a document
///
/// The document is decoded first, so a program is only produced for
/// documents that describe a structurally valid workflow.
pub fn generate(document: &WorkflowDocument, registry: &NodeRegistry) -> Result<GeneratedProgram> {
    from_document(document)?;

    let mut statements = Vec::new();
    for node in &document.nodes {
        emit_node(node, registry, &mut statements);
    }
    statements.extend(document.edges.iter().cloned().map(Statement::Connect));

    log::debug!(
        "Generated {} builder statements for '{}'",
        statements.len(),
        document.metadata.title
    );
    Ok(GeneratedProgram {
        metadata: document.metadata.clone(),
        statements,
    })
}

/// Generate and render Rust builder source for a document
pub fn generate_source(document: &WorkflowDocument, registry: &NodeRegistry) -> Result<String> {
    Ok(generate(document, registry)?.render())
}

fn emit_node(node: &NodeDocument, registry: &NodeRegistry, out: &mut Vec<Statement>) {
    let descriptor = registry
        .get(&node.node_type)
        .filter(|d| builds_prefix_of(d, node));

    let declared = match descriptor {
        Some(descriptor) => {
            out.push(Statement::CreateNode {
                node_type: node.node_type.clone(),
                id: node.id.clone(),
            });
            descriptor.ports.len()
        }
        None => {
            out.push(Statement::DeclareNode {
                id: node.id.clone(),
                node_type: node.node_type.clone(),
                category: node.category.clone(),
            });
            0
        }
    };

    for port in &node.ports[declared..] {
        out.push(Statement::AddPort {
            node_id: node.id.clone(),
            port: PortDocument {
                value: Value::Null,
                ..port.clone()
            },
        });
    }

    for (index, port) in node.ports.iter().enumerate() {
        let default = descriptor
            .filter(|_| index < declared)
            .and_then(|d| d.ports[index].default_value.clone())
            .unwrap_or(Value::Null);
        if port.value != default {
            out.push(Statement::SetValue {
                node_id: node.id.clone(),
                port: port.name.clone(),
                value: port.value.clone(),
            });
        }
    }
}

/// Whether the descriptor's default ports are exactly the first ports of the node
fn builds_prefix_of(descriptor: &NodeDescriptor, node: &NodeDocument) -> bool {
    descriptor.category == node.category
        && descriptor.ports.len() <= node.ports.len()
        && descriptor.ports.iter().zip(&node.ports).all(|(spec, port)| {
            spec.name == port.name
                && spec.data_type == port.data_type
                && spec.is_output == port.is_output
                && spec.multiple == port.multiple
        })
}

impl GeneratedProgram {
    /// Run the statements against a fresh workflow
    pub fn execute(&self, registry: &NodeRegistry) -> Result<Workflow> {
        let mut workflow = Workflow::with_metadata(self.metadata.clone());
        for statement in &self.statements {
            match statement {
                Statement::CreateNode { node_type, id } => {
                    workflow.add_node(registry.create_node(node_type, id.clone())?)?;
                }
                Statement::DeclareNode {
                    id,
                    node_type,
                    category,
                } => {
                    workflow.add_node(Node::new(id.clone(), node_type.clone(), category.clone()))?;
                }
                Statement::AddPort { node_id, port } => {
                    let mut declared = if port.is_output {
                        Port::output(port.name.clone(), port.data_type)
                    } else {
                        Port::input(port.name.clone(), port.data_type)
                    };
                    declared.multiple = port.multiple;
                    workflow.add_port(node_id, declared)?;
                }
                Statement::SetValue {
                    node_id,
                    port,
                    value,
                } => workflow.set_port_value(node_id, port, value.clone())?,
                Statement::Connect(edge) => workflow.connect(
                    &edge.source_node_id,
                    &edge.source_port,
                    &edge.target_node_id,
                    &edge.target_port,
                )?,
            }
        }
        Ok(workflow)
    }

    /// Render as a Rust function building the workflow
    pub fn render(&self) -> String {
        let uses_json = self
            .statements
            .iter()
            .any(|s| matches!(s, Statement::SetValue { .. }));
        let declares = self
            .statements
            .iter()
            .any(|s| matches!(s, Statement::DeclareNode { .. }));
        let adds_ports = self
            .statements
            .iter()
            .any(|s| matches!(s, Statement::AddPort { .. }));

        let mut imports = Vec::new();
        if declares {
            imports.extend(["Node", "NodeCategory"]);
        }
        imports.push("NodeRegistry");
        if adds_ports {
            imports.extend(["Port", "PortDataType"]);
        }
        imports.extend(["Workflow", "WorkflowMetadata"]);

        let mut out = String::new();
        if uses_json {
            out.push_str("use serde_json::json;\n");
        }
        let _ = writeln!(out, "use workflow_graph::{{{}}};\n", imports.join(", "));
        let title: Vec<&str> = self
            .metadata
            .title
            .split(char::is_control)
            .filter(|part| !part.is_empty())
            .collect();
        let _ = writeln!(out, "/// {}", title.join(" "));
        out.push_str(
            "pub fn build_workflow(registry: &NodeRegistry) -> workflow_graph::Result<Workflow> {\n",
        );
        let _ = writeln!(
            out,
            "    let mut workflow = Workflow::with_metadata(WorkflowMetadata::new({:?}, {:?}, {:?}));",
            self.metadata.title, self.metadata.brief, self.metadata.language
        );

        let mut in_connections = false;
        for statement in &self.statements {
            if matches!(statement, Statement::Connect(_)) && !in_connections {
                out.push('\n');
                in_connections = true;
            } else if matches!(statement, Statement::CreateNode { .. } | Statement::DeclareNode { .. }) {
                out.push('\n');
            }
            let _ = writeln!(out, "    {}", render_statement(statement));
        }

        out.push_str("\n    Ok(workflow)\n}\n");
        out
    }
}

fn render_statement(statement: &Statement) -> String {
    match statement {
        Statement::CreateNode { node_type, id } => {
            format!("workflow.add_node(registry.create_node({:?}, {:?})?)?;", node_type, id)
        }
        Statement::DeclareNode {
            id,
            node_type,
            category,
        } => format!(
            "workflow.add_node(Node::new({:?}, {:?}, NodeCategory::from({:?}.to_string())))?;",
            id,
            node_type,
            category.as_str()
        ),
        Statement::AddPort { node_id, port } => {
            let constructor = if port.is_output { "output" } else { "input" };
            let multiple = if port.multiple { ".multiple()" } else { "" };
            format!(
                "workflow.add_port({:?}, Port::{}({:?}, PortDataType::{}){})?;",
                node_id,
                constructor,
                port.name,
                port.data_type.variant_name(),
                multiple
            )
        }
        Statement::SetValue {
            node_id,
            port,
            value,
        } => format!(
            "workflow.set_port_value({:?}, {:?}, json!({}))?;",
            node_id,
            port,
            render_json(value)
        ),
        Statement::Connect(edge) => format!(
            "workflow.connect({:?}, {:?}, {:?}, {:?})?;",
            edge.source_node_id, edge.source_port, edge.target_node_id, edge.target_port
        ),
    }
}

/// Render a JSON value as `json!` macro input with Rust string literals
fn render_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("{:?}", s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(render_json).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{:?}: {}", k, render_json(v)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}
