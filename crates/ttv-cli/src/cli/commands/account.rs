//! `ttv register`, `login`, `logout`, `whoami`.

use anyhow::{Context as _, Result};
use std::io::{self, BufRead, Write};
use ttv_core::api::ApiError;

use crate::cli::context::Context;
use crate::cli::Outcome;

/// Password from `--password` or one line of stdin.
fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub async fn run_register(ctx: &Context, username: &str, password: Option<String>) -> Result<Outcome> {
    let password = password_or_prompt(password)?;
    let message = ctx.anonymous_client()?.register(username, &password).await?;
    println!("{message}");
    Ok(Outcome::Done)
}

pub async fn run_login(ctx: &Context, username: &str, password: Option<String>) -> Result<Outcome> {
    let password = password_or_prompt(password)?;
    // A stale cookie from an earlier account must not leak into this login.
    ctx.store.destroy()?;
    let user = ctx.login_client()?.login(username, &password).await?;
    ctx.store.establish(ctx.server_url(), user.clone())?;
    println!("Logged in as {} (id {}) at {}", user.username, user.id, ctx.server_url());
    Ok(Outcome::Done)
}

pub async fn run_logout(ctx: &Context) -> Result<Outcome> {
    match ctx.session_client() {
        Ok((session, api)) => {
            if let Err(e) = api.logout().await {
                tracing::warn!("server logout failed: {e}");
            }
            println!("Logged out {}.", session.user.username);
        }
        Err(_) => println!("Not logged in."),
    }
    ctx.store.destroy()?;
    Ok(Outcome::Done)
}

pub async fn run_whoami(ctx: &Context) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    match api.current_user().await {
        Ok(user) => {
            println!("{} (id {}) at {}", user.username, user.id, ctx.server_url());
            Ok(Outcome::Done)
        }
        Err(ApiError::Unauthorized) => {
            ctx.store.destroy()?;
            Err(ApiError::Unauthorized.into())
        }
        Err(e) => Err(e.into()),
    }
}
