//! Language model nodes
//!
//! Every chat model shares the same port layout; only the type tag and the
//! default model differ.

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Port ID for the prompt input
pub const PORT_PROMPT: &str = "prompt";
/// Port ID for the model name
pub const PORT_LLM_MODEL: &str = "llm_model";
/// Port ID for the completion output
pub const PORT_OUTPUT: &str = "output";

fn chat_model(node_type: &str, label: &str, default_model: &str) -> NodeDescriptor {
    NodeDescriptor::new(
        node_type,
        NodeCategory::Llms,
        label,
        format!("Chat completion with {}", label),
    )
    .with_port(PortSpec::input(PORT_PROMPT, PortDataType::Text).with_default(""))
    .with_port(PortSpec::input(PORT_LLM_MODEL, PortDataType::Text).with_default(default_model))
    .with_port(PortSpec::input("temperature", PortDataType::Number).with_default(0.7))
    .with_port(PortSpec::input("top_p", PortDataType::Number).with_default(0.95))
    .with_port(PortSpec::input("response_format", PortDataType::Text).with_default("text"))
    .with_port(PortSpec::output(PORT_OUTPUT, PortDataType::Text))
}

pub struct OpenAI;

impl NodeKind for OpenAI {
    fn descriptor() -> NodeDescriptor {
        chat_model("OpenAI", "OpenAI", "gpt-4o-mini")
    }
}

inventory::submit!(workflow_graph::DescriptorFn(OpenAI::descriptor));

pub struct Deepseek;

impl NodeKind for Deepseek {
    fn descriptor() -> NodeDescriptor {
        chat_model("Deepseek", "DeepSeek", "deepseek-chat")
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Deepseek::descriptor));

pub struct Claude;

impl NodeKind for Claude {
    fn descriptor() -> NodeDescriptor {
        chat_model("Claude", "Claude", "claude-3-5-sonnet")
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Claude::descriptor));
