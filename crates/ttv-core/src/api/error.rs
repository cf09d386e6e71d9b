//! Errors from REST calls.

use thiserror::Error;

use crate::transfer::TransferError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No valid session: the server answered 401 or redirected to its login page.
    #[error("not logged in or session expired; run `ttv login`")]
    Unauthorized,
    /// Server rejected the request with `{"status": "error", "message": ...}`.
    #[error("server rejected request (HTTP {status}): {message}")]
    Server { status: u32, message: String },
    /// Request could not be completed at the transport level.
    #[error("network error: {0}")]
    Transfer(#[from] TransferError),
    /// Response body was not the JSON shape the endpoint documents.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
    /// Rejected locally before contacting the server.
    #[error("{0}")]
    InvalidInput(String),
}
