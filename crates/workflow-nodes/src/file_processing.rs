//! File processing nodes

use workflow_graph::{NodeCategory, NodeDescriptor, NodeKind, PortDataType, PortSpec};

/// Files uploaded by the user when the workflow runs
///
/// The output is the list of uploaded file references.
pub struct FileUpload;

impl NodeKind for FileUpload {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "FileUpload",
            NodeCategory::FileProcessing,
            "File upload",
            "Collects files uploaded at run time",
        )
        .with_port(PortSpec::input("files", PortDataType::File).multiple())
        .with_port(PortSpec::input("unzip_files", PortDataType::Boolean).with_default(false))
        .with_port(PortSpec::output("output", PortDataType::List))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(FileUpload::descriptor));

/// Parses documents into text
pub struct FileLoader;

impl NodeKind for FileLoader {
    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::new(
            "FileLoader",
            NodeCategory::FileProcessing,
            "File loader",
            "Extracts the text content of documents",
        )
        .with_port(PortSpec::input("files", PortDataType::File).multiple())
        .with_port(PortSpec::input("parse_quality", PortDataType::Text).with_default("default"))
        .with_port(PortSpec::output("output", PortDataType::Text))
    }
}

inventory::submit!(workflow_graph::DescriptorFn(FileLoader::descriptor));
