//! `ttv download` – fetch a file, verify it against the server's digest, save it.

use anyhow::{Context as _, Result};
use std::path::PathBuf;
use ttv_core::api::ApiClient;
use ttv_core::catalog::{build_catalog, find_entry, original_name_from_label};
use ttv_core::integrity::{IntegrityVerdict, Verification};
use ttv_core::naming::save_name;
use ttv_core::save::save_payload;

use crate::cli::context::Context;
use crate::cli::Outcome;

/// Catalog label for `stored_name`, or the stored name when the catalog
/// cannot be fetched or does not list it.
async fn display_label(api: &ApiClient, stored_name: &str) -> String {
    match tokio::try_join!(api.my_files(), api.shared_files()) {
        Ok((mine, shared)) => find_entry(&build_catalog(&mine, &shared), stored_name)
            .map(|e| e.display_name.clone())
            .unwrap_or_else(|| stored_name.to_string()),
        Err(e) => {
            tracing::debug!("catalog lookup failed: {e}");
            stored_name.to_string()
        }
    }
}

pub async fn run_download(
    ctx: &Context,
    stored_name: &str,
    name: Option<&str>,
    out: Option<PathBuf>,
    overwrite: bool,
) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let label = match name {
        Some(n) => n.to_string(),
        None => display_label(&api, stored_name).await,
    };

    println!("Downloading {label}...");
    let dl = api
        .download(stored_name, &label)
        .await
        .context("download failed")?;
    let result = &dl.result;
    let verification = &dl.verification;

    // Report the verdict before touching the disk; it stands even if saving fails.
    for line in verification_lines(verification) {
        println!("{line}");
    }

    let dir = match out.or_else(|| ctx.cfg.download_dir.clone()) {
        Some(d) => d,
        None => std::env::current_dir()?,
    };
    let file_name = save_name(
        result.server_filename(),
        original_name_from_label(result.display_name()),
        result.stored_name(),
    );
    let saved = save_payload(&dir, &file_name, result.payload(), overwrite);
    if let Ok(path) = &saved {
        println!("Saved {} bytes to {}", result.payload().len(), path.display());
    }
    finish(verification.verdict, saved)
}

fn verification_lines(v: &Verification) -> Vec<String> {
    vec![
        format!("Local SHA256:  {}", v.local),
        format!(
            "Server SHA256: {}",
            v.declared.as_deref().unwrap_or("(not provided)")
        ),
        v.verdict.describe().to_string(),
    ]
}

/// Exit outcome once the verdict is known and the save was attempted.
/// A mismatch outranks a failed save.
fn finish(verdict: IntegrityVerdict, saved: Result<PathBuf>) -> Result<Outcome> {
    match (verdict, saved) {
        (IntegrityVerdict::Mismatch, Ok(path)) => {
            eprintln!("warning: {} does not match the server's digest", path.display());
            Ok(Outcome::IntegrityMismatch)
        }
        (IntegrityVerdict::Mismatch, Err(e)) => {
            eprintln!("ttv error: {:#}", e.context("save failed"));
            Ok(Outcome::IntegrityMismatch)
        }
        (verdict, Ok(_)) => Ok(Outcome::from_verdict(verdict)),
        (_, Err(e)) => Err(e.context("save failed")),
    }
}
