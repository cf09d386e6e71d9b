//! SHA-256 digests as lowercase hex.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const BUF_SIZE: usize = 64 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const SHA256_HEX_LEN: usize = 64;

/// Hex-encoded SHA-256 digest. Always 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashDigest(String);

impl HashDigest {
    /// Parses a hex digest as sent by a server or typed by a user.
    /// Surrounding whitespace and uppercase hex are accepted; anything that is
    /// not exactly 64 hex characters yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != SHA256_HEX_LEN || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(HashDigest(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against a digest string from elsewhere.
    pub fn matches_hex(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.trim())
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 of an in-memory payload. The whole slice is hashed.
pub fn sha256_bytes(data: &[u8]) -> HashDigest {
    HashDigest(hex::encode(Sha256::digest(data)))
}

/// Compute SHA-256 of a file and return the digest.
/// Reads in chunks to keep memory use bounded; suitable for large files.
pub fn sha256_path(path: &Path) -> Result<HashDigest> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(HashDigest(hex::encode(hasher.finalize())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn sha256_bytes_empty() {
        assert_eq!(sha256_bytes(b"").as_str(), EMPTY);
    }

    #[test]
    fn sha256_bytes_is_deterministic() {
        let data: Vec<u8> = (0u8..=255).cycle().take(10_000).collect();
        assert_eq!(sha256_bytes(&data), sha256_bytes(&data));
        assert_ne!(sha256_bytes(&data), sha256_bytes(&data[1..]));
    }

    #[test]
    fn sha256_path_matches_bytes() {
        let body: Vec<u8> = (0u8..100).cycle().take(200 * 1024).collect();
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(&body).unwrap();
        f.flush().unwrap();
        assert_eq!(sha256_path(f.path()).unwrap(), sha256_bytes(&body));
    }

    #[test]
    fn sha256_path_known_content() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"hello\n").unwrap();
        f.flush().unwrap();
        assert_eq!(
            sha256_path(f.path()).unwrap().as_str(),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }

    #[test]
    fn sha256_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(sha256_path(&dir.path().join("nope.bin")).is_err());
    }

    #[test]
    fn parse_accepts_uppercase_and_whitespace() {
        let d = HashDigest::parse(&format!("  {}\n", EMPTY.to_uppercase())).unwrap();
        assert_eq!(d.as_str(), EMPTY);
    }

    #[test]
    fn parse_rejects_bad_length_and_chars() {
        assert!(HashDigest::parse(&EMPTY[..63]).is_none());
        assert!(HashDigest::parse(&format!("{}0", EMPTY)).is_none());
        assert!(HashDigest::parse(&EMPTY.replace('e', "g")).is_none());
        assert!(HashDigest::parse("").is_none());
    }
}
