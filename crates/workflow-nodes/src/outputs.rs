//! Output nodes
//!
//! Nodes that present results to the user of the remote platform.

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Displays text, optionally under a title
pub struct Text;

impl Text {
    /// Port ID for the displayed text
    pub const PORT_TEXT: &'static str = "text";
    /// Port ID for the display title
    pub const PORT_OUTPUT_TITLE: &'static str = "output_title";
}

impl NodeKind for Text {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new("Text", NodeCategory::Outputs, "Text output", "Displays text")
            .with_port(PortSpec::input(Self::PORT_TEXT, PortDataType::Text).with_default(""))
            .with_port(PortSpec::input(Self::PORT_OUTPUT_TITLE, PortDataType::Text).with_default(""))
            .with_port(PortSpec::output("output", PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Text::descriptor));

/// Renders CSV or markdown table content
pub struct Table;

impl NodeKind for Table {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new("Table", NodeCategory::Outputs, "Table", "Displays tabular content")
            .with_port(PortSpec::input("content", PortDataType::Text).with_default(""))
            .with_port(PortSpec::input("content_type", PortDataType::Text).with_default("csv"))
            .with_port(PortSpec::output("output", PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Table::descriptor));
