//! Error types for the Spindle CLI

use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// API communication errors
    #[error("API error: {0}")]
    Api(#[from] spindle_sdk::ApiError),

    /// Local filesystem issues
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output serialization failures
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Everything else
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(message.into()))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
