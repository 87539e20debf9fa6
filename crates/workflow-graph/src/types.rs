//! Core types for workflow graphs
//!
//! These types define the structure of workflow graphs: nodes, their
//! ports and port values, connections, and workflow metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::constants::defaults;
use crate::error::{GraphError, Result};

/// Unique identifier for a node
pub type NodeId = String;

/// The data type tag of a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDataType {
    /// Text string
    Text,
    /// Numeric value
    Number,
    /// Boolean value
    Boolean,
    /// JSON array
    List,
    /// JSON object
    Object,
    /// File reference (path or URL)
    File,
    /// Image reference
    Image,
    /// Audio reference
    Audio,
    /// Video reference
    Video,
    /// Accepts any type
    Any,
}

impl PortDataType {
    /// Check if an output of this type can feed an input of `target` type
    pub fn is_compatible_with(&self, target: &PortDataType) -> bool {
        use PortDataType::*;

        // Any type is compatible with everything
        if matches!(self, Any) || matches!(target, Any) {
            return true;
        }

        match (self, target) {
            // Scalars render to text
            (Number, Text) | (Boolean, Text) => true,
            // Media references are files
            (Image, File) | (Audio, File) | (Video, File) => true,
            _ => self == target,
        }
    }

    /// Wire name of this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::List => "list",
            Self::Object => "object",
            Self::File => "file",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Any => "any",
        }
    }

    /// Rust path of this tag, used by generated builder code
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::List => "List",
            Self::Object => "Object",
            Self::File => "File",
            Self::Image => "Image",
            Self::Audio => "Audio",
            Self::Video => "Video",
            Self::Any => "Any",
        }
    }
}

impl std::fmt::Display for PortDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value held by a port, keyed by the port's declared data type
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PortValue {
    /// No value assigned
    #[default]
    Empty,
    Text(String),
    Number(serde_json::Number),
    Boolean(bool),
    List(Vec<Value>),
    Object(Map<String, Value>),
}

impl PortValue {
    /// Convert a raw JSON value into a port value for the given tag
    ///
    /// Returns `None` when the JSON shape does not fit the tag. `null`
    /// is always accepted and means "no value".
    pub fn from_json(data_type: PortDataType, value: Value) -> Option<Self> {
        use PortDataType as T;

        match (data_type, value) {
            (_, Value::Null) => Some(Self::Empty),
            (T::Text, Value::String(s)) => Some(Self::Text(s)),
            (T::Number, Value::Number(n)) => Some(Self::Number(n)),
            (T::Boolean, Value::Bool(b)) => Some(Self::Boolean(b)),
            (T::List, Value::Array(items)) => Some(Self::List(items)),
            (T::Object, Value::Object(map)) => Some(Self::Object(map)),
            (T::File | T::Image | T::Audio | T::Video, Value::String(s)) => Some(Self::Text(s)),
            (T::File | T::Image | T::Audio | T::Video, Value::Array(items)) => {
                Some(Self::List(items))
            }
            (T::Any, value) => Some(Self::from_any(value)),
            _ => None,
        }
    }

    fn from_any(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) => Self::Text(s),
            Value::Number(n) => Self::Number(n),
            Value::Bool(b) => Self::Boolean(b),
            Value::Array(items) => Self::List(items),
            Value::Object(map) => Self::Object(map),
        }
    }

    /// Convert back into raw JSON
    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Text(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::List(items) => Value::Array(items.clone()),
            Self::Object(map) => Value::Object(map.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A named, typed attachment point on a node
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    /// Port name, unique within its node
    pub name: String,
    /// Declared data type
    pub data_type: PortDataType,
    /// Output ports are connection sources, input ports are targets
    pub is_output: bool,
    /// Current value
    pub value: PortValue,
    /// Whether an input port accepts more than one incoming connection
    pub multiple: bool,
}

impl Port {
    /// Create an input port with no value
    pub fn input(name: impl Into<String>, data_type: PortDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_output: false,
            value: PortValue::Empty,
            multiple: false,
        }
    }

    /// Create an output port with no value
    pub fn output(name: impl Into<String>, data_type: PortDataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_output: true,
            value: PortValue::Empty,
            multiple: false,
        }
    }

    /// Allow this input port to take multiple incoming connections
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Maximum number of incoming connections, `None` when unbounded
    pub fn max_incoming(&self) -> Option<usize> {
        if self.is_output {
            Some(0)
        } else if self.multiple {
            None
        } else {
            Some(1)
        }
    }
}

/// Category of a node, used for grouping and diagram shapes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeCategory {
    /// Workflow entry points (schedules, button triggers)
    Triggers,
    /// Text input, templating, splitting and extraction
    TextProcessing,
    /// Language model calls
    Llms,
    /// Result presentation (text, tables, documents)
    Outputs,
    /// Scripting and utility tools
    Tools,
    /// File upload and parsing
    FileProcessing,
    /// Image generation models
    ImageGeneration,
    /// Image, audio and video processing
    MediaProcessing,
    /// Web page and search crawlers
    WebCrawlers,
    /// Vector database operations
    VectorDb,
    /// Conditionals, loops and merges
    ControlFlows,
    /// Any category not known to this engine
    Custom(String),
}

impl NodeCategory {
    /// Wire name of this category
    pub fn as_str(&self) -> &str {
        match self {
            Self::Triggers => "triggers",
            Self::TextProcessing => "textProcessing",
            Self::Llms => "llms",
            Self::Outputs => "outputs",
            Self::Tools => "tools",
            Self::FileProcessing => "fileProcessing",
            Self::ImageGeneration => "imageGeneration",
            Self::MediaProcessing => "mediaProcessing",
            Self::WebCrawlers => "webCrawlers",
            Self::VectorDb => "vectorDb",
            Self::ControlFlows => "controlFlows",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for NodeCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "triggers" => Self::Triggers,
            "textProcessing" => Self::TextProcessing,
            "llms" => Self::Llms,
            "outputs" => Self::Outputs,
            "tools" => Self::Tools,
            "fileProcessing" => Self::FileProcessing,
            "imageGeneration" => Self::ImageGeneration,
            "mediaProcessing" => Self::MediaProcessing,
            "webCrawlers" => Self::WebCrawlers,
            "vectorDb" => Self::VectorDb,
            "controlFlows" => Self::ControlFlows,
            _ => Self::Custom(value),
        }
    }
}

impl From<NodeCategory> for String {
    fn from(value: NodeCategory) -> Self {
        match value {
            NodeCategory::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual position of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node instance in a workflow
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Unique identifier within the workflow
    pub id: NodeId,
    /// Node type tag (references a registered descriptor)
    pub node_type: String,
    /// Category of the node type
    pub category: NodeCategory,
    /// Position in the UI
    pub position: Position,
    ports: Vec<Port>,
}

impl Node {
    /// Create a node with no ports
    pub fn new(id: impl Into<String>, node_type: impl Into<String>, category: NodeCategory) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            category,
            position: Position::default(),
            ports: Vec::new(),
        }
    }

    /// Ports in declaration order
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Find a port by name
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Append a port, failing if the name is taken
    pub fn add_port(&mut self, port: Port) -> Result<()> {
        if self.port(&port.name).is_some() {
            return Err(GraphError::DuplicatePort {
                node_id: self.id.clone(),
                port: port.name,
            });
        }
        self.ports.push(port);
        Ok(())
    }

    /// Assign a value to a port after checking it against the declared tag
    pub fn set_port_value(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let node_id = self.id.clone();
        let port = self
            .ports
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| GraphError::UnknownPort {
                node_id: node_id.clone(),
                port: name.to_string(),
            })?;

        let value = PortValue::from_json(port.data_type, value.into()).ok_or_else(|| {
            GraphError::InvalidValue {
                node_id,
                port: name.to_string(),
                expected: port.data_type,
            }
        })?;
        port.value = value;
        Ok(())
    }
}

/// A directed edge from an output port to an input port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    pub source_node_id: NodeId,
    pub source_port: String,
    pub target_node_id: NodeId,
    pub target_port: String,
}

impl Connection {
    pub fn new(
        source_node_id: impl Into<String>,
        source_port: impl Into<String>,
        target_node_id: impl Into<String>,
        target_port: impl Into<String>,
    ) -> Self {
        Self {
            source_node_id: source_node_id.into(),
            source_port: source_port.into(),
            target_node_id: target_node_id.into(),
            target_port: target_port.into(),
        }
    }

    /// Whether either endpoint belongs to the node
    pub fn touches(&self, node_id: &str) -> bool {
        self.source_node_id == node_id || self.target_node_id == node_id
    }
}

impl std::fmt::Display for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.source_node_id, self.source_port, self.target_node_id, self.target_port
        )
    }
}

/// Descriptive metadata carried alongside the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowMetadata {
    pub title: String,
    pub brief: String,
    /// Language tag of the workflow content (e.g. "zh-CN")
    pub language: String,
}

impl WorkflowMetadata {
    pub fn new(
        title: impl Into<String>,
        brief: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            brief: brief.into(),
            language: language.into(),
        }
    }
}

impl Default for WorkflowMetadata {
    fn default() -> Self {
        Self::new(defaults::TITLE, "", defaults::LANGUAGE)
    }
}
