//! Tri-state comparison of a local digest against a server-declared one.

use anyhow::Result;
use serde::Serialize;
use std::fmt;
use std::path::Path;

use super::digest::{sha256_bytes, sha256_path, HashDigest};

/// Outcome of comparing the local digest with the server's declared digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityVerdict {
    /// Declared digest present and equal to the local digest.
    Match,
    /// Declared digest present and different (or not a valid digest at all).
    Mismatch,
    /// Server did not declare a digest; nothing can be asserted.
    Indeterminate,
}

impl IntegrityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrityVerdict::Match => "match",
            IntegrityVerdict::Mismatch => "mismatch",
            IntegrityVerdict::Indeterminate => "indeterminate",
        }
    }

    /// Human-readable line, as shown after a download.
    pub fn describe(&self) -> &'static str {
        match self {
            IntegrityVerdict::Match => "Integrity check: MATCH, file is intact.",
            IntegrityVerdict::Mismatch => "Integrity check: MISMATCH, file might be corrupted.",
            IntegrityVerdict::Indeterminate => "Integrity check: server hash not provided.",
        }
    }
}

impl fmt::Display for IntegrityVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local digest, the declared digest (as received) and the resulting verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub local: HashDigest,
    pub declared: Option<String>,
    pub verdict: IntegrityVerdict,
}

/// Verdict for an already computed local digest.
///
/// An absent or blank declared value is `Indeterminate`. Comparison ignores
/// hex case and surrounding whitespace.
pub fn verdict_for(local: &HashDigest, declared: Option<&str>) -> IntegrityVerdict {
    match declared.map(str::trim).filter(|d| !d.is_empty()) {
        None => IntegrityVerdict::Indeterminate,
        Some(d) if local.matches_hex(d) => IntegrityVerdict::Match,
        Some(d) => {
            if HashDigest::parse(d).is_none() {
                tracing::warn!(declared = d, "declared digest is not a SHA-256 hex string");
            }
            IntegrityVerdict::Mismatch
        }
    }
}

/// Hash the complete payload and compare it with the declared digest.
pub fn verify(payload: &[u8], declared: Option<&str>) -> Verification {
    let local = sha256_bytes(payload);
    let verdict = verdict_for(&local, declared);
    Verification {
        local,
        declared: declared.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        verdict,
    }
}

/// Same as [`verify`] for a file already on disk.
pub fn verify_file(path: &Path, declared: Option<&str>) -> Result<Verification> {
    let local = sha256_path(path)?;
    let verdict = verdict_for(&local, declared);
    Ok(Verification {
        local,
        declared: declared.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
        verdict,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ZEROS_1K: &str = "5f70bf18a086007016e948b04aed3b82103a36bea41755b6cddfaf10ace3c6ef";

    #[test]
    fn zero_kib_matches_known_digest() {
        let payload = vec![0u8; 1024];
        let v = verify(&payload, Some(ZEROS_1K));
        assert_eq!(v.local.as_str(), ZEROS_1K);
        assert_eq!(v.verdict, IntegrityVerdict::Match);
    }

    #[test]
    fn zero_kib_against_other_digest_is_mismatch() {
        let payload = vec![0u8; 1024];
        let empty = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert_eq!(verify(&payload, Some(empty)).verdict, IntegrityVerdict::Mismatch);
    }

    #[test]
    fn truncated_declared_digest_is_mismatch() {
        let payload = vec![0u8; 1024];
        let short = "5f70bf18a086007016e948b04aed3b82103a36bea41755148132a3b2cadc377";
        assert_eq!(verify(&payload, Some(short)).verdict, IntegrityVerdict::Mismatch);
    }

    #[test]
    fn declared_digest_case_is_ignored() {
        let payload = vec![0u8; 1024];
        let upper = ZEROS_1K.to_uppercase();
        assert_eq!(verify(&payload, Some(&upper)).verdict, IntegrityVerdict::Match);
    }

    #[test]
    fn missing_or_blank_declared_digest_is_indeterminate() {
        let payload = b"anything";
        let v = verify(payload, None);
        assert_eq!(v.verdict, IntegrityVerdict::Indeterminate);
        assert!(v.declared.is_none());
        assert_eq!(verify(payload, Some("  ")).verdict, IntegrityVerdict::Indeterminate);
    }

    #[test]
    fn any_single_bit_flip_is_mismatch() {
        let payload: Vec<u8> = (0u8..=255).collect();
        let declared = sha256_bytes(&payload);
        for byte in [0usize, 17, 128, 255] {
            for bit in 0..8 {
                let mut corrupted = payload.clone();
                corrupted[byte] ^= 1 << bit;
                let v = verify(&corrupted, Some(declared.as_str()));
                assert_eq!(v.verdict, IntegrityVerdict::Mismatch, "byte {byte} bit {bit}");
            }
        }
    }

    #[test]
    fn verify_file_uses_whole_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&vec![0u8; 1024]).unwrap();
        f.flush().unwrap();
        let v = verify_file(f.path(), Some(ZEROS_1K)).unwrap();
        assert_eq!(v.verdict, IntegrityVerdict::Match);
        let v = verify_file(f.path(), None).unwrap();
        assert_eq!(v.verdict, IntegrityVerdict::Indeterminate);
    }
}
