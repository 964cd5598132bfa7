use std::path::PathBuf;

use clap::Parser;

use crate::cli::{commands::Commands, handlers};
use crate::config::CliConfig;
use crate::error::Result;

/// Spindle CLI - LP catalog client
#[derive(Parser, Debug)]
#[command(
    name = "spindle",
    version,
    about = "Spindle CLI - browse and manage the LP catalog",
    long_about = "Command-line client for the Spindle LP catalog.

QUICK START:
  spindle signup                    # Create an account
  spindle login                     # Sign in and store the session
  spindle ls                        # List LPs
  spindle show <id>                 # Show one LP
  spindle logout                    # Discard the session

CONFIGURATION:
  spindle config show               # Show configuration
  spindle config set api.base_url <url>"
)]
pub struct Args {
    /// Configuration file path (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overriding the configuration file
    #[arg(long, global = true, env = "SPINDLE_API_URL")]
    pub api_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        // Initialize logging based on verbosity
        let log_level = if self.verbose { "debug" } else { "warn" };

        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
            .with_target(false)
            .init();

        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => CliConfig::config_path()?,
        };
        let mut config = CliConfig::load_from_path(&config_path).await?;
        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.trim_end_matches('/').to_string();
        }

        match self.command {
            Commands::Signup { email, name } => {
                handlers::auth::handle_signup(&config, email, name).await
            }
            Commands::Login { email } => handlers::auth::handle_login(&config, email).await,
            Commands::Logout => handlers::auth::handle_logout(&config).await,
            Commands::Status => handlers::auth::handle_status(&config, self.json).await,

            Commands::Ls {
                cursor,
                limit,
                search,
                order,
                all,
            } => {
                handlers::lps::handle_ls(&config, cursor, limit, search, order, all, self.json)
                    .await
            }
            Commands::Show { id } => handlers::lps::handle_show(&config, id, self.json).await,

            Commands::Config { action } => {
                handlers::config::handle_config(action, &config_path, self.json).await
            }
        }
    }
}
