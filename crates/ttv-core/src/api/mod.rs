//! JSON REST client for the file-sharing server.
//!
//! Wraps the server's endpoints (register, login, listing, upload, share,
//! download) as async methods. Each call runs one blocking curl transfer on
//! tokio's blocking pool; the session cookie travels through the cookie jar
//! named by the [`crate::session::Session`].

mod client;
mod error;
mod models;

pub use client::{ApiClient, UploadOutcome, VerifiedDownload};
pub use error::ApiError;
pub use models::{FileRecord, ReplyStatus, ShareOutcome, SharedFileEntry, UploadReceipt, User};
