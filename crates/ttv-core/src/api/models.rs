//! Wire types of the server's JSON responses.

use serde::{Deserialize, Serialize};

/// `status` field present in every server reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
}

/// A file uploaded to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    /// Original filename as uploaded by the user.
    pub filename: String,
    /// Unique server-side name; used in download URLs.
    pub stored_filename: String,
    /// Server-computed SHA-256 at upload time.
    pub sha256: String,
    pub uploader_id: i64,
    #[serde(default)]
    pub uploader_username: String,
    /// Unix seconds.
    #[serde(default)]
    pub upload_timestamp: i64,
}

/// A file someone shared with the current user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedFileEntry {
    pub id: i64,
    pub file_id: i64,
    pub file_info: FileRecord,
    pub sender_id: i64,
    pub sender_username: String,
    pub receiver_id: i64,
    #[serde(default)]
    pub receiver_username: String,
    #[serde(default)]
    pub share_timestamp: i64,
}

/// Reply to `POST /upload`. `Warning` means the file was stored but the
/// server could not hash it, so `sha256` and `stored_filename` are absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadReceipt {
    pub status: ReplyStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub stored_filename: Option<String>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub file_id: Option<i64>,
}

/// Reply to `POST /share_file`. `Warning` means it was already shared.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShareOutcome {
    pub status: ReplyStatus,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserReply {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsersReply {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FilesReply {
    pub files: Vec<FileRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SharedFilesReply {
    pub files: Vec<SharedFileEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MessageReply {
    #[serde(default)]
    pub message: String,
}
