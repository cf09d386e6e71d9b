//! Writing a downloaded payload to disk.
//!
//! The payload goes to `<name>.part` first, is fsynced, then renamed over the
//! final name so a crash never leaves a half-written file under the real name.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Saves `payload` as `dir/name` and returns the final path.
///
/// `name` must already be sanitized (see [`crate::naming::save_name`]).
/// Refuses to replace an existing file unless `overwrite` is set.
pub fn save_payload(dir: &Path, name: &str, payload: &[u8], overwrite: bool) -> Result<PathBuf> {
    let final_path = dir.join(name);
    if final_path.exists() && !overwrite {
        anyhow::bail!(
            "file already exists: {} (use --overwrite to replace)",
            final_path.display()
        );
    }
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

    let tmp = temp_path(&final_path);
    let mut f = fs::File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let written = f
        .write_all(payload)
        .and_then(|()| f.sync_all())
        .with_context(|| format!("write {}", tmp.display()));
    drop(f);
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    fs::rename(&tmp, &final_path).with_context(|| {
        format!(
            "failed to rename {} to {}",
            tmp.display(),
            final_path.display()
        )
    })?;
    tracing::debug!(path = %final_path.display(), bytes = payload.len(), "payload saved");
    Ok(final_path)
}
