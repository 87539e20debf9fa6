//! Web crawler nodes

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Fetches a web page and extracts its title and text
pub struct TextCrawler;

impl NodeKind for TextCrawler {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "TextCrawler",
            NodeCategory::WebCrawlers,
            "Text crawler",
            "Extracts the readable text of a web page",
        )
        .with_port(PortSpec::input("url", PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("output_type", PortDataType::Text).with_default("text"))
        .with_port(PortSpec::output("output_title", PortDataType::Text))
        .with_port(PortSpec::output("output_text", PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(TextCrawler::descriptor));
