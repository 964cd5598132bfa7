//! Command handlers

pub mod auth;
pub mod config;
pub mod lps;

use std::sync::Arc;
use std::time::Duration;

use spindle_sdk::{FileTokenStore, LpClient};

use crate::config::CliConfig;
use crate::error::Result;

/// Build a client wired to the persisted token file, so sessions survive
/// across invocations
pub(crate) fn build_client(config: &CliConfig) -> Result<LpClient> {
    let storage = Arc::new(FileTokenStore::new(CliConfig::token_path()?));
    let client = LpClient::builder()
        .base_url(&config.api.base_url)
        .timeout(Duration::from_secs(config.api.timeout_seconds))
        .token_storage(storage)
        .build()?;
    Ok(client)
}
