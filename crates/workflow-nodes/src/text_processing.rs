//! Text processing nodes
//!
//! Text entry, templating, splitting, extraction and list rendering.

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Text entered by the user, passed through unchanged
pub struct TextInOut;

impl TextInOut {
    /// Port ID for the text value
    pub const PORT_TEXT: &'static str = "text";
    /// Port ID for the passed-through text
    pub const PORT_OUTPUT: &'static str = "output";
}

impl NodeKind for TextInOut {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "TextInOut",
            NodeCategory::TextProcessing,
            "Text input",
            "Provides user-entered text to the workflow",
        )
        .with_port(PortSpec::input(Self::PORT_TEXT, PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("input_type", PortDataType::Text).with_default("text"))
        .with_port(PortSpec::output(Self::PORT_OUTPUT, PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(TextInOut::descriptor));

/// Fills `{{variable}}` placeholders in a template
///
/// Variables are extra input ports added per workflow, one per placeholder.
pub struct TemplateCompose;

impl TemplateCompose {
    /// Port ID for the template text
    pub const PORT_TEMPLATE: &'static str = "template";
    /// Port ID for the rendered text
    pub const PORT_OUTPUT: &'static str = "output";
}

impl NodeKind for TemplateCompose {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "TemplateCompose",
            NodeCategory::TextProcessing,
            "Template compose",
            "Renders a template with values from its variable inputs",
        )
        .with_port(PortSpec::input(Self::PORT_TEMPLATE, PortDataType::Text).with_default(""))
        .with_port(PortSpec::output(Self::PORT_OUTPUT, PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(TemplateCompose::descriptor));

/// Splits text into chunks
pub struct TextSplitters;

impl NodeKind for TextSplitters {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "TextSplitters",
            NodeCategory::TextProcessing,
            "Text splitters",
            "Splits text by length, delimiter or markdown structure",
        )
        .with_port(PortSpec::input("text", PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("split_method", PortDataType::Text).with_default("general"))
        .with_port(PortSpec::input("chunk_length", PortDataType::Number).with_default(500))
        .with_port(PortSpec::input("delimiter", PortDataType::Text).with_default("\n"))
        .with_port(PortSpec::output("output", PortDataType::List))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(TextSplitters::descriptor));

/// Extracts regex matches from text or from each item of a list
pub struct RegexExtract;

impl NodeKind for RegexExtract {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "RegexExtract",
            NodeCategory::TextProcessing,
            "Regex extract",
            "Extracts the first or all matches of a pattern",
        )
        .with_port(PortSpec::input("text", PortDataType::Any))
        .with_port(PortSpec::input("pattern", PortDataType::Text).with_default("```.*?\\n(.*?)\\n```"))
        .with_port(PortSpec::input("first_match", PortDataType::Boolean).with_default(true))
        .with_port(PortSpec::output("output", PortDataType::Any))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(RegexExtract::descriptor));

/// Joins list items into text or a markdown list
pub struct ListRender;

impl NodeKind for ListRender {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "ListRender",
            NodeCategory::TextProcessing,
            "List render",
            "Renders list items with a separator",
        )
        .with_port(PortSpec::input("list", PortDataType::List))
        .with_port(PortSpec::input("separator", PortDataType::Text).with_default("\n\n"))
        .with_port(PortSpec::input("output_type", PortDataType::Text).with_default("text"))
        .with_port(PortSpec::output("output", PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(ListRender::descriptor));
