//! HTTP transfers over libcurl.
//!
//! Every request made by the client (REST calls, file downloads, push-channel
//! long polls) goes through [`HttpClient::execute`], which buffers the whole
//! response body, captures the final response's headers and reports failures
//! as a [`TransferError`]. Blocking; call from `spawn_blocking` in async code.

mod client;
mod error;
mod parse;

pub use client::{ClientOptions, HttpClient, Request, RequestBody, Response};
pub use error::TransferError;
pub use parse::{parse_header_lines, ResponseHead};
