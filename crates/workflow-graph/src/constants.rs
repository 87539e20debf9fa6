//! Engine-wide constants
//!
//! Single source of truth for default option values.

/// Default workflow metadata
pub mod defaults {
    /// Title given to workflows created without one
    pub const TITLE: &str = "New workflow";
    /// Default content language tag
    pub const LANGUAGE: &str = "zh-CN";
}

/// Layout defaults
pub mod layout {
    /// Distance between neighbouring nodes within a layer
    pub const NODE_SPACING: f64 = 300.0;
    /// Distance between consecutive layers
    pub const LAYER_SPACING: f64 = 200.0;
    /// Number of forward/backward barycenter sweeps
    pub const SWEEPS: usize = 4;
}

/// Structural analysis defaults
pub mod analysis {
    /// Leave isolated nodes out of per-category and fan-in/out figures
    pub const CONNECTED_ONLY: bool = true;
    /// Maximum length of the LLM-facing summary
    pub const MAX_LENGTH: usize = 2000;
}

/// Snapshot history defaults
pub mod history {
    /// Number of snapshots kept before the oldest is dropped
    pub const MAX_SNAPSHOTS: usize = 100;
    /// zstd compression level for snapshots
    pub const COMPRESSION_LEVEL: i32 = 3;
}

/// Configuration file naming
pub mod paths {
    /// File name of the engine configuration inside its directory
    pub const CONFIG_FILE: &str = "workflow-graph.json";
}
