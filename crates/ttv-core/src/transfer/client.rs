//! Blocking libcurl client shared by REST calls, downloads and push polling.

use curl::easy::{Easy, Form, List};
use std::path::PathBuf;
use std::str;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::error::TransferError;
use super::parse::{find_header, parse_header_lines, ResponseHead};

const LOGIN_PAGE_PATH: &str = "/login_page";

/// Connection settings applied to every request made by one client.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    /// Hard limit for the whole request, body included.
    pub timeout: Duration,
    /// Netscape-format cookie file; read before and written after each request.
    pub cookie_jar: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(300),
            cookie_jar: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RequestBody {
    /// GET, no body.
    None,
    /// POST with an empty body.
    Empty,
    Json(Vec<u8>),
    /// `text/plain` body (Engine.IO polling payloads).
    Text(String),
    /// multipart/form-data with one file part.
    File { field: String, path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Request {
    pub url: String,
    pub body: RequestBody,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::None,
        }
    }

    pub fn post_empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::Empty,
        }
    }

    pub fn post_json(url: impl Into<String>, value: &serde_json::Value) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::Json(value.to_string().into_bytes()),
        }
    }

    pub fn post_text(url: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::Text(text.into()),
        }
    }

    pub fn post_file(url: impl Into<String>, field: &str, path: PathBuf) -> Self {
        Self {
            url: url.into(),
            body: RequestBody::File {
                field: field.to_string(),
                path,
            },
        }
    }
}

/// A complete response: status, final headers and the fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u32,
    /// URL of the final response after redirects.
    pub effective_url: Option<String>,
    pub headers: Vec<(String, String)>,
    pub head: ResponseHead,
    pub body: Vec<u8>,
}

impl Response {
    /// Last value of a header, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The server answers unauthenticated page requests with a redirect to
    /// its login page instead of a 401.
    pub fn redirected_to_login(&self) -> bool {
        self.effective_url
            .as_deref()
            .is_some_and(|u| u.contains(LOGIN_PAGE_PATH))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The server's `{"message": ...}` if the body is such JSON, else a generic line.
    pub fn error_message(&self) -> String {
        serde_json::from_slice::<serde_json::Value>(&self.body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or_else(|| format!("server returned HTTP {}", self.status))
    }

    /// Turn a non-2xx response into `TransferError::Http`.
    pub fn into_success(self) -> Result<Response, TransferError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransferError::Http {
                status: self.status,
                message: self.error_message(),
            })
        }
    }
}

/// Cheap to clone; each `execute` uses a fresh curl handle.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    opts: ClientOptions,
    abort: Option<Arc<AtomicBool>>,
}

impl HttpClient {
    pub fn new(opts: ClientOptions) -> Self {
        Self { opts, abort: None }
    }

    /// Abort in-flight transfers once `token` is set.
    pub fn with_abort(mut self, token: Arc<AtomicBool>) -> Self {
        self.abort = Some(token);
        self
    }

    /// Performs the request and buffers the whole body.
    ///
    /// Follows redirects. Any status is returned as `Ok`; use
    /// [`Response::into_success`] to reject non-2xx. A 2xx body shorter than
    /// its `Content-Length` is reported as `TransferError::Truncated`, also
    /// when curl itself fails the transfer as a partial file.
    pub fn execute(&self, req: &Request) -> Result<Response, TransferError> {
        let mut easy = Easy::new();
        easy.url(&req.url)
            .map_err(|_| TransferError::InvalidUrl(req.url.clone()))?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.opts.connect_timeout)?;
        easy.timeout(self.opts.timeout)?;
        if let Some(jar) = &self.opts.cookie_jar {
            easy.cookie_file(jar)?;
            easy.cookie_jar(jar)?;
        }

        let mut list = List::new();
        match &req.body {
            RequestBody::None => {}
            RequestBody::Empty => {
                easy.post(true)?;
                easy.post_fields_copy(b"")?;
            }
            RequestBody::Json(bytes) => {
                easy.post(true)?;
                easy.post_fields_copy(bytes)?;
                list.append("Content-Type: application/json")?;
            }
            RequestBody::Text(text) => {
                easy.post(true)?;
                easy.post_fields_copy(text.as_bytes())?;
                list.append("Content-Type: text/plain;charset=UTF-8")?;
            }
            RequestBody::File { field, path } => {
                let mut form = Form::new();
                form.part(field).file(path).add()?;
                easy.httppost(form)?;
            }
        }
        easy.http_headers(list)?;
        if self.abort.is_some() {
            easy.progress(true)?;
        }

        let mut body: Vec<u8> = Vec::new();
        let mut header_lines: Vec<String> = Vec::new();
        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            if let Some(abort) = &self.abort {
                transfer.progress_function(move |_, _, _, _| !abort.load(Ordering::Relaxed))?;
            }
            transfer.perform()
        };

        let headers = parse_header_lines(&header_lines);
        let head = ResponseHead::from_headers(&headers);
        if let Err(e) = performed {
            if e.is_partial_file() {
                if let Some(short) = short_body(&head, body.len()) {
                    tracing::debug!(url = %req.url, error = %e, "partial body");
                    return Err(short);
                }
            }
            return Err(e.into());
        }

        let status = easy.response_code()?;
        let effective_url = easy.effective_url()?.map(str::to_string);
        tracing::debug!(url = %req.url, status, bytes = body.len(), "request finished");

        if (200..300).contains(&status) {
            if let Some(short) = short_body(&head, body.len()) {
                return Err(short);
            }
        }

        Ok(Response {
            status,
            effective_url,
            headers,
            head,
            body,
        })
    }
}

/// `Truncated` when fewer bytes arrived than `Content-Length` announced.
fn short_body(head: &ResponseHead, received: usize) -> Option<TransferError> {
    let expected = head.content_length?;
    let received = received as u64;
    (received < expected).then_some(TransferError::Truncated { expected, received })
}
