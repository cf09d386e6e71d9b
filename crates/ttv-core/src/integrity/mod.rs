//! Download integrity verification.
//!
//! After a download has been fully buffered, the client recomputes SHA-256
//! over the exact bytes received and compares it with the digest the server
//! declared out-of-band (the `X-SHA256` response header). The outcome is a
//! tri-state [`IntegrityVerdict`]. A failed transfer never reaches this
//! module: callers only build a [`DownloadResult`] from a complete payload.

mod digest;
mod result;
mod verdict;

pub use digest::{sha256_bytes, sha256_path, HashDigest, SHA256_HEX_LEN};
pub use result::DownloadResult;
pub use verdict::{verdict_for, verify, verify_file, IntegrityVerdict, Verification};
