use super::Context;
use crate::auth;
use crate::config::API_KEY_ENV;
use crate::error::CliError;
use anyhow::Context as _;
use dialoguer::{Input, Password};

/// Handle login command
pub(super) async fn login(ctx: &Context, email: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(|_| CliError::Cancelled)?,
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .map_err(|_| CliError::Cancelled)?;

    tracing::debug!(%email, base_url = %ctx.config.base_url, "authenticating");
    let token = ctx.anonymous_api().authenticate(&email, &password).await?;

    let session = auth::new_session(token, email.clone(), ctx.config.base_url.clone());
    let path = auth::save_session(&session).context("Failed to save session")?;
    tracing::debug!(path = %path.display(), "session saved");

    ctx.status(&format!("Logged in as {email}"));
    if std::env::var_os(API_KEY_ENV).is_some() {
        eprintln!("  note: {API_KEY_ENV} is set and takes precedence over this session");
    }
    Ok(())
}

/// Handle logout command
pub(super) fn logout(ctx: &Context) -> anyhow::Result<()> {
    let path = auth::session_path()?;
    if auth::clear_session_at(&path)? {
        ctx.status("Logged out");
    } else {
        ctx.status("No saved session");
    }
    Ok(())
}

/// Handle whoami command
pub(super) async fn whoami(ctx: &Context) -> anyhow::Result<()> {
    let account = ctx.api()?.account().await?;
    ctx.render(&account)
}
