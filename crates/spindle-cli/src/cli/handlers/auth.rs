//! Authentication command handlers

use dialoguer::{Input, Password};
use serde_json::json;
use spindle_sdk::{ApiError, SigninRequest, SignupRequest};
use tracing::debug;

use crate::cli::handlers::build_client;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_info, print_success};

fn prompt_email(email: Option<String>) -> Result<String> {
    match email {
        Some(email) => Ok(email),
        None => Ok(Input::new().with_prompt("Email").interact_text()?),
    }
}

fn prompt_password(confirm: bool) -> Result<String> {
    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?)
}

/// Handle signup command
pub async fn handle_signup(
    config: &CliConfig,
    email: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password(true)?;

    let client = build_client(config)?;
    client
        .signup(&SignupRequest {
            email: email.clone(),
            password,
            name,
        })
        .await?;

    print_success(&format!("Account created for {email}"));
    print_info("Run 'spindle login' to sign in");
    Ok(())
}

/// Handle login command
pub async fn handle_login(config: &CliConfig, email: Option<String>) -> Result<()> {
    let email = prompt_email(email)?;
    let password = prompt_password(false)?;

    let client = build_client(config)?;
    client.signin(&SigninRequest { email, password }).await?;

    debug!("session tokens persisted to {:?}", CliConfig::token_path()?);
    print_success("Signed in");
    Ok(())
}

/// Handle logout command
pub async fn handle_logout(config: &CliConfig) -> Result<()> {
    let client = build_client(config)?;

    // Local tokens are cleared even when the server call fails; only
    // report the failure for transport problems, a dead session is fine
    match client.signout().await {
        Ok(()) => {}
        Err(ApiError::Authentication { .. } | ApiError::SessionExpired { .. }) => {
            debug!("server session was already gone");
        }
        Err(e) => return Err(e.into()),
    }

    print_success("Signed out");
    Ok(())
}

/// Handle status command
pub async fn handle_status(config: &CliConfig, json: bool) -> Result<()> {
    let client = build_client(config)?;
    let signed_in = client.token_store().load_pair().await.is_some();

    if json {
        return json_output(&json!({ "signedIn": signed_in }));
    }
    if signed_in {
        print_success("A session is stored; requests will be authenticated");
    } else {
        print_info("No session stored; run 'spindle login'");
    }
    Ok(())
}
