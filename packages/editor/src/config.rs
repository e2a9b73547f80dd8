use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::EditorError;

pub const CONFIG_FILE_NAME: &str = "jsongraph.config.json";

/// Editor configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Spaces per nesting level in canonical document text
    #[serde(default = "default_indent_width")]
    pub indent_width: usize,

    /// Display text for a node without rows
    #[serde(default = "default_empty_display")]
    pub empty_display: String,
}

fn default_indent_width() -> usize {
    2
}

fn default_empty_display() -> String {
    "{}".to_string()
}

impl EditorConfig {
    /// Load config from a directory
    ///
    /// A missing config file yields the defaults.
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: EditorConfig = serde_json::from_str(&content)
            .map_err(|e| EditorError::Config(format!("{}: {}", config_path.display(), e)))?;

        tracing::debug!(path = %config_path.display(), ?config, "loaded editor config");
        Ok(config)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_width: default_indent_width(),
            empty_display: default_empty_display(),
        }
    }
}
