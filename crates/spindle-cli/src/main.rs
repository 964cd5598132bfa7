//! Main entry point for the Spindle CLI

use clap::Parser;
use spindle_cli::cli::Args;
use spindle_cli::error::CliError;
use spindle_cli::output::{print_error, print_info};
use spindle_sdk::ApiError;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = args.run().await {
        print_error(&e.to_string());
        if matches!(e, CliError::Api(ApiError::SessionExpired { .. })) {
            print_info("Your session has ended; run 'spindle login' to sign in again");
        }
        std::process::exit(1);
    }
}
