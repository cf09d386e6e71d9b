use thiserror::Error;

use crate::transfer::TransferError;

#[derive(Debug, Error)]
pub enum PushError {
    #[error("push channel transfer failed: {0}")]
    Transfer(#[from] TransferError),
    #[error("malformed packet {packet:?}: {reason}")]
    Malformed { packet: String, reason: String },
    #[error("unsupported packet: {0}")]
    Unsupported(String),
    #[error("push handshake failed: {0}")]
    Handshake(String),
    /// The server refused the namespace connection (not logged in).
    #[error("server refused the push connection: {0}")]
    Rejected(String),
}

impl PushError {
    pub(crate) fn malformed(packet: &str, reason: impl Into<String>) -> Self {
        PushError::Malformed {
            packet: packet.to_string(),
            reason: reason.into(),
        }
    }
}
