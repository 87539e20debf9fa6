//! Control flow nodes
//!
//! Branching and joining. Loops are expressed by the remote platform, not
//! by cycles in the graph.

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Routes a value to one of two outputs by comparing two fields
pub struct Conditional;

impl Conditional {
    pub const PORT_LEFT_FIELD: &'static str = "left_field";
    pub const PORT_TRUE_OUTPUT: &'static str = "true_output";
    pub const PORT_FALSE_OUTPUT: &'static str = "false_output";
}

impl NodeKind for Conditional {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "Conditional",
            NodeCategory::ControlFlows,
            "Conditional",
            "Chooses a branch by comparing two values",
        )
        .with_port(PortSpec::input("field_type", PortDataType::Text).with_default("string"))
        .with_port(PortSpec::input(Self::PORT_LEFT_FIELD, PortDataType::Any))
        .with_port(PortSpec::input("operator", PortDataType::Text).with_default("equal"))
        .with_port(PortSpec::input("right_field", PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("true_input", PortDataType::Any))
        .with_port(PortSpec::input("false_input", PortDataType::Any))
        .with_port(PortSpec::output(Self::PORT_TRUE_OUTPUT, PortDataType::Any))
        .with_port(PortSpec::output(Self::PORT_FALSE_OUTPUT, PortDataType::Any))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Conditional::descriptor));

/// Joins several branches into one, passing on whichever ran
pub struct Empty;

impl NodeKind for Empty {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "Empty",
            NodeCategory::ControlFlows,
            "Empty",
            "Merges branches without changing their values",
        )
        .with_port(PortSpec::input("input", PortDataType::Any).multiple())
        .with_port(PortSpec::output("output", PortDataType::Any))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Empty::descriptor));
