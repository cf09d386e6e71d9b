//! Async REST client over the blocking curl transfer.

use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use url::Url;

use super::error::ApiError;
use super::models::{
    FileRecord, FilesReply, MessageReply, ShareOutcome, SharedFileEntry, SharedFilesReply,
    UploadReceipt, User, UserReply, UsersReply,
};
use crate::config::TtvConfig;
use crate::integrity::{
    sha256_path, verdict_for, DownloadResult, HashDigest, IntegrityVerdict, Verification,
};
use crate::naming::parse_content_disposition_filename;
use crate::session::Session;
use crate::transfer::{HttpClient, Request, Response, TransferError};

/// A download whose payload arrived completely, with its verification.
#[derive(Debug, Clone)]
pub struct VerifiedDownload {
    pub result: DownloadResult,
    pub verification: Verification,
}

/// Upload reply plus the comparison of the server's digest with the local file's.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub receipt: UploadReceipt,
    pub local_digest: HashDigest,
    pub verdict: IntegrityVerdict,
}

/// Client for one server. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: HttpClient,
    hash_header: String,
}

impl ApiClient {
    /// Client for `server_url`; cookies are read from and written to `cookie_jar`.
    pub fn new(
        cfg: &TtvConfig,
        server_url: &str,
        cookie_jar: Option<PathBuf>,
    ) -> Result<Self, ApiError> {
        let base = Url::parse(server_url).map_err(|e| {
            ApiError::InvalidInput(format!("invalid server URL {server_url}: {e}"))
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidInput(format!(
                "server URL {server_url} cannot carry a path"
            )));
        }
        Ok(Self {
            base,
            http: HttpClient::new(cfg.client_options(cookie_jar)),
            hash_header: cfg.hash_header.clone(),
        })
    }

    /// Client bound to an established session.
    pub fn for_session(cfg: &TtvConfig, session: &Session) -> Result<Self, ApiError> {
        Self::new(cfg, &session.server_url, Some(session.cookie_jar.clone()))
    }

    /// Absolute URL for path segments below the server base. Each segment is
    /// percent-encoded, so stored names cannot escape their route.
    pub fn endpoint(&self, segments: &[&str]) -> Result<String, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidInput(format!("server URL {} has no path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    async fn send(&self, req: Request) -> Result<Response, TransferError> {
        let http = self.http.clone();
        tokio::task::spawn_blocking(move || http.execute(&req))
            .await
            .map_err(|e| TransferError::Interrupted(e.to_string()))?
    }

    async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        req: Request,
        auth_required: bool,
    ) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        decode_reply(endpoint, &resp, auth_required)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<String, ApiError> {
        require_credentials(username, password)?;
        let url = self.endpoint(&["register"])?;
        let body = json!({ "username": username, "password": password });
        let reply: MessageReply = self
            .call("register", Request::post_json(url, &body), false)
            .await?;
        tracing::info!(username, "registered");
        Ok(reply.message)
    }

    /// Logs in; on success the session cookie is in the client's cookie jar.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        require_credentials(username, password)?;
        let url = self.endpoint(&["login"])?;
        let body = json!({ "username": username, "password": password });
        let reply: UserReply = self
            .call("login", Request::post_json(url, &body), false)
            .await?;
        tracing::info!(username = %reply.user.username, id = reply.user.id, "logged in");
        Ok(reply.user)
    }

    /// Ends the server-side session. An already expired session counts as logged out.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let url = self.endpoint(&["logout"])?;
        match self
            .call::<MessageReply>("logout", Request::post_empty(url), true)
            .await
        {
            Ok(_) | Err(ApiError::Unauthorized) => Ok(()),
            Err(e) => Err(e),
        }
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let url = self.endpoint(&["get_current_user"])?;
        let reply: UserReply = self.call("get_current_user", Request::get(url), true).await?;
        Ok(reply.user)
    }

    /// Every user except the current one (share targets).
    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let url = self.endpoint(&["users"])?;
        let reply: UsersReply = self.call("users", Request::get(url), true).await?;
        Ok(reply.users)
    }

    /// Files uploaded by the current user.
    pub async fn my_files(&self) -> Result<Vec<FileRecord>, ApiError> {
        let url = self.endpoint(&["my_files"])?;
        let reply: FilesReply = self.call("my_files", Request::get(url), true).await?;
        Ok(reply.files)
    }

    /// Files other users shared with the current user.
    pub async fn shared_files(&self) -> Result<Vec<SharedFileEntry>, ApiError> {
        let url = self.endpoint(&["shared_files"])?;
        let reply: SharedFilesReply = self.call("shared_files", Request::get(url), true).await?;
        Ok(reply.files)
    }

    /// Uploads `path` and checks the server's digest against the local file.
    pub async fn upload(&self, path: &Path) -> Result<UploadOutcome, ApiError> {
        if !path.is_file() {
            return Err(ApiError::InvalidInput(format!(
                "{} is not a readable file",
                path.display()
            )));
        }
        let local_digest = {
            let p = path.to_path_buf();
            tokio::task::spawn_blocking(move || sha256_path(&p))
                .await
                .map_err(|e| TransferError::Interrupted(e.to_string()))?
                .map_err(|e| ApiError::InvalidInput(format!("{e:#}")))?
        };

        let url = self.endpoint(&["upload"])?;
        let receipt: UploadReceipt = self
            .call("upload", Request::post_file(url, "file", path.to_path_buf()), true)
            .await?;
        let verdict = verdict_for(&local_digest, receipt.sha256.as_deref());
        tracing::info!(
            path = %path.display(),
            stored = ?receipt.stored_filename,
            %verdict,
            "upload finished"
        );
        Ok(UploadOutcome {
            receipt,
            local_digest,
            verdict,
        })
    }

    /// Shares one of the current user's files with `receiver_username`.
    pub async fn share_file(
        &self,
        file_id: i64,
        receiver_username: &str,
    ) -> Result<ShareOutcome, ApiError> {
        if receiver_username.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "receiver username is required".to_string(),
            ));
        }
        let url = self.endpoint(&["share_file"])?;
        let body = json!({ "file_id": file_id, "receiver_username": receiver_username });
        self.call("share_file", Request::post_json(url, &body), true)
            .await
    }

    /// Downloads `stored_name` in full, then verifies it against the digest
    /// the server declared in the hash header.
    ///
    /// Fails with `TransferError` (and no verdict) when the payload could not
    /// be retrieved completely.
    pub async fn download(
        &self,
        stored_name: &str,
        display_name: &str,
    ) -> Result<VerifiedDownload, TransferError> {
        let url = self
            .endpoint(&["download", stored_name])
            .map_err(|e| TransferError::InvalidUrl(e.to_string()))?;
        let http = self.http.clone();
        let hash_header = self.hash_header.clone();
        let stored = stored_name.to_string();
        let display = display_name.to_string();

        tokio::task::spawn_blocking(move || {
            let resp = http.execute(&Request::get(url))?;
            if resp.redirected_to_login() {
                return Err(TransferError::Http {
                    status: 401,
                    message: "not logged in or session expired".to_string(),
                });
            }
            let resp = resp.into_success()?;
            let declared = resp.header(&hash_header).map(str::to_string);
            let server_filename = resp
                .head
                .content_disposition
                .as_deref()
                .and_then(parse_content_disposition_filename);
            let content_type = resp.head.content_type.clone();

            let result = DownloadResult::new(resp.body, declared, stored, display)
                .with_server_metadata(server_filename, content_type);
            let verification = result.verify();
            tracing::info!(
                stored = result.stored_name(),
                bytes = result.payload().len(),
                local = %verification.local,
                declared = ?verification.declared,
                verdict = %verification.verdict,
                "download verified"
            );
            Ok(VerifiedDownload {
                result,
                verification,
            })
        })
        .await
        .map_err(|e| TransferError::Interrupted(e.to_string()))?
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }
    Ok(())
}

/// Map a response to the endpoint's reply type or an `ApiError`.
///
/// With `auth_required`, a 401 (or a redirect to the login page) means the
/// session is gone. Without it (login/register), a 401 is an ordinary
/// rejection whose message is shown to the user.
fn decode_reply<T: DeserializeOwned>(
    endpoint: &str,
    resp: &Response,
    auth_required: bool,
) -> Result<T, ApiError> {
    if auth_required && (resp.status == 401 || resp.redirected_to_login()) {
        return Err(ApiError::Unauthorized);
    }
    if !resp.is_success() {
        return Err(ApiError::Server {
            status: resp.status,
            message: resp.error_message(),
        });
    }
    serde_json::from_slice(&resp.body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}
