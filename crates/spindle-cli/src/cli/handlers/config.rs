//! Configuration command handlers

use std::path::Path;

use crate::cli::commands::ConfigAction;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_success};

/// Handle config subcommands
pub async fn handle_config(action: ConfigAction, config_path: &Path, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = CliConfig::load_from_path(config_path).await?;
            if json {
                return json_output(&config);
            }
            println!("{}", toml::to_string_pretty(&config).unwrap_or_default());
            Ok(())
        }
        ConfigAction::Get { key } => {
            let config = CliConfig::load_from_path(config_path).await?;
            println!("{}", config.get(&key)?);
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = CliConfig::load_from_path(config_path).await?;
            config.set(&key, &value)?;
            config.save_to_path(config_path).await?;
            print_success(&format!("Set {key}"));
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}
