//! A completed download, ready to be verified.

use super::verdict::{verify, Verification};

/// Bytes of one completed download plus what the server said about them.
///
/// Only built from a fully received payload; a truncated or failed transfer
/// produces a `TransferError` instead. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    payload: Vec<u8>,
    declared_hash: Option<String>,
    stored_name: String,
    display_name: String,
    server_filename: Option<String>,
    content_type: Option<String>,
}

impl DownloadResult {
    pub fn new(
        payload: Vec<u8>,
        declared_hash: Option<String>,
        stored_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            payload,
            declared_hash,
            stored_name: stored_name.into(),
            display_name: display_name.into(),
            server_filename: None,
            content_type: None,
        }
    }

    /// Attach the filename from `Content-Disposition` and the `Content-Type`.
    pub fn with_server_metadata(
        mut self,
        server_filename: Option<String>,
        content_type: Option<String>,
    ) -> Self {
        self.server_filename = server_filename;
        self.content_type = content_type;
        self
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn declared_hash(&self) -> Option<&str> {
        self.declared_hash.as_deref()
    }

    pub fn stored_name(&self) -> &str {
        &self.stored_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn server_filename(&self) -> Option<&str> {
        self.server_filename.as_deref()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Hash the whole payload and compare with the declared digest.
    pub fn verify(&self) -> Verification {
        verify(&self.payload, self.declared_hash.as_deref())
    }
}
