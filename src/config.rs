use crate::app::ViewMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub browser: BrowserConfig,
}

/// Where and how to reach the directory-listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ServerConfig {
    /// Base URL of the listing server; `/api/directorycontents` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Browser behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BrowserConfig {
    /// View shown on startup
    #[serde(default)]
    pub initial_view: ViewMode,

    /// Drop a listing request while another one for the same path is in flight
    #[serde(default = "default_true")]
    pub dedupe_requests: bool,

    /// Two clicks on the same entry within this many milliseconds are a double click
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,

    /// Width of one tile in the file view, in columns
    #[serde(default = "default_tile_width")]
    pub tile_width: u16,
}

fn default_true() -> bool {
    true
}

fn default_double_click_ms() -> u64 {
    400
}

fn default_tile_width() -> u16 {
    18
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            initial_view: ViewMode::default(),
            dedupe_requests: true,
            double_click_ms: default_double_click_ms(),
            tile_width: default_tile_width(),
        }
    }
}

impl BrowserConfig {
    pub fn double_click_threshold(&self) -> Duration {
        Duration::from_millis(self.double_click_ms)
    }
}

impl Config {
    /// Config file name inside the config directory
    pub const FILENAME: &'static str = "config.json";

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Load the user config if one exists, falling back to defaults
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => {
                tracing::info!("Loading config from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `{config_dir}/dirview/config.json`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dirview").join(Self::FILENAME))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.base_url must not be empty".to_string(),
            ));
        }
        if self.browser.tile_width < 4 {
            return Err(ConfigError::Validation(
                "browser.tile_width must be at least 4".to_string(),
            ));
        }
        Ok(())
    }

    /// JSON schema of the config file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(Config)).unwrap_or_default()
    }
}

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}
