//! Configuration models for .papertalk/config.json.
//!
//! Serde models for the papertalk configuration: where the backend lives,
//! the model settings pushed to it, and where transcript exports land.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default config directory path.
pub const PAPERTALK_DIR: &str = ".papertalk";
/// Default config file path.
pub const CONFIG_FILE: &str = ".papertalk/config.json";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    #[error("config IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid JSON for this schema.
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the backend server lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds for non-streaming endpoints.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:1999".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Model settings mirrored to the backend via `POST /api/settings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Model API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl ModelSettings {
    /// Whether all three fields are present, i.e. pushable to the backend.
    pub fn is_complete(&self) -> bool {
        self.base_url.is_some() && self.api_key.is_some() && self.model.is_some()
    }

    /// The API key with all but the first four characters masked.
    pub fn masked_key(&self) -> String {
        match self.api_key.as_deref() {
            None => "(not set)".to_string(),
            Some(key) if key.len() <= 4 => "****".to_string(),
            Some(key) => format!("{}{}", &key[..4], "*".repeat(key.len() - 4)),
        }
    }
}

/// Where transcript exports are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for `chat_history_<date>.txt` files.
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

fn default_export_dir() -> String {
    ".".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

/// Top-level papertalk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PapertalkConfig {
    /// Backend server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Model settings.
    #[serde(default)]
    pub model: ModelSettings,
    /// Export settings.
    #[serde(default)]
    pub export: ExportConfig,
}

impl PapertalkConfig {
    /// Load config from `<dir>/.papertalk/config.json`.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load(dir: Option<&Path>) -> Result<Self, ConfigError> {
        let path = config_path(dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to `<dir>/.papertalk/config.json`, creating the
    /// directory if needed.
    pub fn save(&self, dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        let path = config_path(dir);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// Resolve the config file path under an optional base directory.
fn config_path(dir: Option<&Path>) -> PathBuf {
    match dir {
        Some(dir) => dir.join(CONFIG_FILE),
        None => PathBuf::from(CONFIG_FILE),
    }
}
