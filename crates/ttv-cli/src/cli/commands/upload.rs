//! `ttv upload` – upload a file and check the server's digest.

use anyhow::Result;
use std::path::Path;
use ttv_core::api::ReplyStatus;

use crate::cli::context::Context;
use crate::cli::Outcome;

pub async fn run_upload(ctx: &Context, path: &Path) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let outcome = api.upload(path).await?;
    let receipt = &outcome.receipt;

    match receipt.status {
        ReplyStatus::Success => println!("{}", receipt.message),
        ReplyStatus::Warning | ReplyStatus::Error => println!("Server: {}", receipt.message),
    }
    if let Some(stored) = &receipt.stored_filename {
        println!("Stored as: {stored}");
    }
    println!("Local SHA256:  {}", outcome.local_digest);
    println!(
        "Server SHA256: {}",
        receipt.sha256.as_deref().unwrap_or("(not provided)")
    );
    println!("{}", outcome.verdict.describe());
    Ok(Outcome::from_verdict(outcome.verdict))
}
