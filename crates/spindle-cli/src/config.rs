//! Configuration management for the Spindle CLI

use std::path::{Path, PathBuf};

use etcetera::{choose_base_strategy, BaseStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CliError, Result};

/// CLI configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// API configuration
    pub api: ApiConfig,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the Spindle API
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a specific path, falling back to defaults
    /// when the file does not exist
    pub async fn load_from_path(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            debug!(
                "Configuration file not found, using defaults: {}",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await.map_err(CliError::Io)?;
        toml::from_str(&content)
            .map_err(|e| CliError::config(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a specific path
    pub async fn save_to_path(&self, path: &Path) -> Result<()> {
        debug!("Saving configuration to: {}", path.display());

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(CliError::Io)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {e}")))?;
        tokio::fs::write(path, content).await.map_err(CliError::Io)?;

        info!("Configuration saved");
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api.base_url" | "api-url" => Ok(self.api.base_url.clone()),
            "api.timeout_seconds" | "timeout" => Ok(self.api.timeout_seconds.to_string()),
            _ => Err(CliError::config(format!("Unknown configuration key: {key}"))),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" | "api-url" => {
                self.api.base_url = value.trim_end_matches('/').to_string();
            }
            "api.timeout_seconds" | "timeout" => {
                self.api.timeout_seconds = value
                    .parse()
                    .map_err(|_| CliError::config(format!("Invalid timeout value: {value}")))?;
            }
            _ => {
                return Err(CliError::config(format!("Unknown configuration key: {key}")));
            }
        }
        Ok(())
    }

    /// Default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Configuration directory, created on demand by save
    pub fn config_dir() -> Result<PathBuf> {
        let strategy = choose_base_strategy()
            .map_err(|e| CliError::config(format!("Failed to locate config directory: {e}")))?;
        Ok(strategy.config_dir().join("spindle"))
    }

    /// Data directory, used for the persisted token file
    pub fn data_dir() -> Result<PathBuf> {
        let strategy = choose_base_strategy()
            .map_err(|e| CliError::config(format!("Failed to locate data directory: {e}")))?;
        Ok(strategy.data_dir().join("spindle"))
    }

    /// Path of the persisted token file
    pub fn token_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("tokens.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = CliConfig::load_from_path(&dir.path().join("absent.toml"))
            .await
            .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = CliConfig::default();
        config.set("api.base_url", "https://api.spindle.example/").unwrap();
        config.save_to_path(&path).await.unwrap();

        let reloaded = CliConfig::load_from_path(&path).await.unwrap();
        assert_eq!(reloaded.api.base_url, "https://api.spindle.example");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let mut config = CliConfig::default();
        assert!(config.get("nope").is_err());
        assert!(config.set("nope", "x").is_err());
        assert!(config.set("timeout", "not-a-number").is_err());
    }
}
