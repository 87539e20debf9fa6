//! Engine configuration storage
//!
//! Handles persistent storage of layout, analysis and history options.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::analysis::AnalysisConfig;
use crate::constants::paths;
use crate::history::HistoryConfig;
use crate::layout::LayoutOptions;

/// Engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub layout: LayoutOptions,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Load configuration from `<dir>/workflow-graph.json`, or defaults if absent
    pub async fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(paths::CONFIG_FILE);

        if !config_path.exists() {
            log::debug!("No config at {}; using defaults", config_path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).await?;
        let config = serde_json::from_str(&contents).map_err(ConfigError::Parse)?;
        log::info!("Loaded engine config from {}", config_path.display());
        Ok(config)
    }

    /// Save configuration to `<dir>/workflow-graph.json`, creating `dir` if needed
    pub async fn save(&self, dir: &Path) -> Result<(), ConfigError> {
        fs::create_dir_all(dir).await?;

        let config_path = dir.join(paths::CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(&config_path, contents).await?;

        log::info!("Saved engine config to {}", config_path.display());
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutDirection;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(dir.path()).await.unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.layout.node_spacing, 300.0);
        assert!(config.analysis.connected_only);
        assert_eq!(config.analysis.max_length, 2000);
        assert_eq!(config.history.max_snapshots, 100);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("engine");

        let mut config = EngineConfig::default();
        config.layout.direction = LayoutDirection::BT;
        config.analysis.max_length = 500;
        config.save(&nested).await.unwrap();

        let loaded = EngineConfig::load(&nested).await.unwrap();
        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("workflow-graph.json"),
            r#"{"layout": {"direction": "TB"}, "history": {"max_snapshots": 5}}"#,
        )
        .unwrap();

        let config = EngineConfig::load(dir.path()).await.unwrap();
        assert_eq!(config.layout.direction, LayoutDirection::TB);
        assert_eq!(config.layout.layer_spacing, 200.0);
        assert_eq!(config.history.max_snapshots, 5);
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("workflow-graph.json"), "{ nope").unwrap();
        let err = EngineConfig::load(dir.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
