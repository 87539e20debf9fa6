//! Image generation and media processing nodes

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Stamps a text or image watermark onto an image
pub struct ImageWatermark;

impl ImageWatermark {
    /// Port ID for the source image
    pub const PORT_INPUT_IMAGE: &'static str = "input_image";
}

impl NodeKind for ImageWatermark {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "ImageWatermark",
            NodeCategory::MediaProcessing,
            "Image watermark",
            "Adds a watermark to an image",
        )
        .with_port(PortSpec::input(Self::PORT_INPUT_IMAGE, PortDataType::Image))
        .with_port(PortSpec::input("image_or_text", PortDataType::Text).with_default("text"))
        .with_port(PortSpec::input("watermark_text", PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("watermark_image", PortDataType::Image))
        .with_port(PortSpec::output("output", PortDataType::Image))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(ImageWatermark::descriptor));

/// Text-to-image generation
pub struct Flux;

impl NodeKind for Flux {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "Flux",
            NodeCategory::ImageGeneration,
            "FLUX",
            "Generates an image from a prompt",
        )
        .with_port(PortSpec::input("prompt", PortDataType::Text).with_default(""))
        .with_port(PortSpec::input("model", PortDataType::Text).with_default("FLUX.1 [schnell]"))
        .with_port(PortSpec::input("width", PortDataType::Number).with_default(1024))
        .with_port(PortSpec::input("height", PortDataType::Number).with_default(1024))
        .with_port(PortSpec::output("output", PortDataType::Image))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(Flux::descriptor));
