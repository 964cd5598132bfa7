//! # Spindle CLI
//!
//! Command-line client for the Spindle LP catalog.
//!
//! - Clap-based argument parsing with derive macros
//! - Handler-based command processing
//! - Session tokens persisted under the platform data directory, so the
//!   transparent refresh-and-replay in the SDK carries across invocations

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Args;
pub use error::{CliError, Result};
