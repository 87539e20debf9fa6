//! Tool nodes

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Runs user code on the remote platform
///
/// Inputs are added per workflow; each becomes a named argument of the code.
/// With `list_input` set, list-valued inputs are mapped item by item.
pub struct ProgrammingFunction;

impl ProgrammingFunction {
    pub const PORT_LANGUAGE: &'static str = "language";
    pub const PORT_CODE: &'static str = "code";
    pub const PORT_LIST_INPUT: &'static str = "list_input";
    pub const PORT_USE_OVERSEA_NODE: &'static str = "use_oversea_node";
    pub const PORT_OUTPUT: &'static str = "output";
}

impl NodeKind for ProgrammingFunction {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "ProgrammingFunction",
            NodeCategory::Tools,
            "Programming function",
            "Executes a code snippet with the node's inputs as arguments",
        )
        .with_port(PortSpec::input(Self::PORT_LANGUAGE, PortDataType::Text).with_default("python"))
        .with_port(PortSpec::input(Self::PORT_CODE, PortDataType::Text).with_default(""))
        .with_port(PortSpec::input(Self::PORT_LIST_INPUT, PortDataType::Boolean).with_default(false))
        .with_port(
            PortSpec::input(Self::PORT_USE_OVERSEA_NODE, PortDataType::Boolean).with_default(false),
        )
        .with_port(PortSpec::output(Self::PORT_OUTPUT, PortDataType::Any))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(ProgrammingFunction::descriptor));
