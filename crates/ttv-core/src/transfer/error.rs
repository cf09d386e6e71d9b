//! Transfer failure taxonomy.

use thiserror::Error;

/// The payload could not be fully retrieved. Distinct from an integrity
/// mismatch: no verdict is ever produced for a failed transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// Curl reported an error (connect failure, timeout, connection reset,
    /// partial body, aborted by the caller).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Building the multipart upload form failed.
    #[error("upload form: {0}")]
    Form(#[from] curl::FormError),
    /// Server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http { status: u32, message: String },
    /// Body ended before the advertised `Content-Length`.
    #[error("truncated transfer: expected {expected} bytes, received {received}")]
    Truncated { expected: u64, received: u64 },
    /// URL could not be built for the request.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    /// The blocking transfer task did not complete (panicked or was cancelled).
    #[error("transfer task interrupted: {0}")]
    Interrupted(String),
}

impl TransferError {
    /// True when the transfer was stopped by the caller's abort token.
    pub fn is_aborted(&self) -> bool {
        matches!(self, TransferError::Curl(e) if e.is_aborted_by_callback())
    }

    /// True for timeouts (long polls end this way when the server is silent).
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransferError::Curl(e) if e.is_operation_timedout())
    }
}
