//! `ttv verify` and `ttv checksum` – local files only.

use anyhow::Result;
use std::path::Path;
use ttv_core::integrity;

use crate::cli::Outcome;

/// Compute and print SHA-256 of the given file.
pub async fn run_checksum(path: &Path) -> Result<Outcome> {
    let digest = integrity::sha256_path(path)?;
    println!("{}  {}", digest, path.display());
    Ok(Outcome::Done)
}

/// Verify a file against `expect`; same verdict rules as a download.
pub async fn run_verify(path: &Path, expect: Option<&str>) -> Result<Outcome> {
    let v = integrity::verify_file(path, expect)?;
    println!("Local SHA256:    {}", v.local);
    println!(
        "Expected SHA256: {}",
        v.declared.as_deref().unwrap_or("(not provided)")
    );
    println!("{}", v.verdict.describe());
    Ok(Outcome::from_verdict(v.verdict))
}
