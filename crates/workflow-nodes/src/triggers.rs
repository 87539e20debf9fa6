//! Trigger nodes

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Starts the workflow when the user presses its run button
pub struct ButtonTrigger;

impl NodeKind for ButtonTrigger {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "ButtonTrigger",
            NodeCategory::Triggers,
            "Button trigger",
            "Entry point started manually",
        )
        .with_port(PortSpec::output("output", PortDataType::Any))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(ButtonTrigger::descriptor));
