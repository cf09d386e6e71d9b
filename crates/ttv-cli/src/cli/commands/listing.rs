//! `ttv users`, `files`, `shared`, `catalog`.

use anyhow::Result;
use ttv_core::api::SharedFileEntry;
use ttv_core::catalog::{build_catalog, DownloadEntry};

use crate::cli::context::Context;
use crate::cli::Outcome;

pub async fn run_users(ctx: &Context) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let users = api.users().await?;
    if users.is_empty() {
        println!("No other users.");
    } else {
        println!("{:<6} {}", "ID", "USERNAME");
        for u in users {
            println!("{:<6} {}", u.id, u.username);
        }
    }
    Ok(Outcome::Done)
}

pub async fn run_files(ctx: &Context) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let files = api.my_files().await?;
    if files.is_empty() {
        println!("You have not uploaded any files.");
    } else {
        println!("{:<6} {:<30} {:<40} {}", "ID", "NAME", "STORED AS", "SHA256");
        for f in files {
            println!(
                "{:<6} {:<30} {:<40} {}",
                f.id, f.filename, f.stored_filename, f.sha256
            );
        }
    }
    Ok(Outcome::Done)
}

/// Header plus one row per shared file.
pub(crate) fn shared_rows(shared: &[SharedFileEntry]) -> Vec<String> {
    let mut rows = vec![format!("{:<6} {:<30} {:<16} {}", "ID", "NAME", "FROM", "STORED AS")];
    rows.extend(shared.iter().map(|s| {
        format!(
            "{:<6} {:<30} {:<16} {}",
            s.file_id, s.file_info.filename, s.sender_username, s.file_info.stored_filename
        )
    }));
    rows
}

pub async fn run_shared(ctx: &Context) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let shared = api.shared_files().await?;
    if shared.is_empty() {
        println!("No files have been shared with you.");
    } else {
        for row in shared_rows(&shared) {
            println!("{row}");
        }
    }
    Ok(Outcome::Done)
}

/// Header plus one row per entry, with the digest recorded at upload.
fn catalog_rows(catalog: &[DownloadEntry]) -> Vec<String> {
    let mut rows = vec![format!("{:<40} {:<64} {}", "STORED AS", "SHA256", "FILE")];
    rows.extend(
        catalog
            .iter()
            .map(|e| format!("{:<40} {:<64} {}", e.stored_filename, e.sha256, e.display_name)),
    );
    rows
}

pub async fn run_catalog(ctx: &Context) -> Result<Outcome> {
    let (_, api) = ctx.session_client()?;
    let (mine, shared) = tokio::try_join!(api.my_files(), api.shared_files())?;
    let catalog = build_catalog(&mine, &shared);
    if catalog.is_empty() {
        println!("Nothing to download yet.");
    } else {
        for row in catalog_rows(&catalog) {
            println!("{row}");
        }
    }
    Ok(Outcome::Done)
}
