use clap::{Subcommand, ValueEnum};

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Signup {
        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,

        /// Display name
        #[arg(long)]
        name: Option<String>,
    },

    /// Sign in and persist the session tokens
    Login {
        /// Account email (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and discard the session tokens
    Logout,

    /// Show whether a session is currently stored
    Status,

    /// List LPs in the catalog
    Ls {
        /// Start listing from this cursor
        #[arg(long)]
        cursor: Option<u64>,

        /// Page size
        #[arg(long)]
        limit: Option<u64>,

        /// Filter by title/content search
        #[arg(long)]
        search: Option<String>,

        /// Sort direction
        #[arg(long, value_enum)]
        order: Option<SortOrder>,

        /// Follow cursors and list every page
        #[arg(long)]
        all: bool,
    },

    /// Show a single LP
    Show {
        /// LP id
        id: u64,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the active configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key, e.g. api.base_url
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key, e.g. api.base_url
        key: String,

        /// New value
        value: String,
    },

    /// Print the configuration file path
    Path,
}

/// Sort direction for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl From<SortOrder> for spindle_sdk::Order {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => Self::Asc,
            SortOrder::Desc => Self::Desc,
        }
    }
}
