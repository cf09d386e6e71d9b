//! Typed push events and what each one invalidates.

use serde::Deserialize;
use serde_json::Value;

use crate::api::{FileRecord, User};

/// Payload of `new_file_uploaded`, broadcast to every connected client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewFileNotice {
    pub file: FileRecord,
    pub uploader: String,
}

/// Payload of `file_shared_with_me`, sent only to the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SharedWithMeNotice {
    pub file_id: i64,
    pub file_info: FileRecord,
    pub sender_username: String,
}

/// Payload of `my_response`, the server's greeting after connect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Greeting {
    pub data: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Client-side lists that must be re-fetched after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTarget {
    SharedFiles,
    DownloadCatalog,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Joined the default namespace.
    Connected { sid: String },
    /// Server closed the channel.
    Disconnected,
    ServerGreeting(Greeting),
    NewFileUploaded(NewFileNotice),
    FileSharedWithMe(SharedWithMeNotice),
    /// Any event this client does not model.
    Other { name: String, args: Vec<Value> },
}

impl PushEvent {
    /// Decodes a Socket.IO event. Known events whose payload does not have
    /// the expected shape are kept as `Other` so one bad message does not
    /// end the listener.
    pub fn from_event(name: &str, args: Vec<Value>) -> PushEvent {
        let first = args.first().cloned().unwrap_or(Value::Null);
        let decoded = match name {
            "new_file_uploaded" => serde_json::from_value(first).map(PushEvent::NewFileUploaded),
            "file_shared_with_me" => {
                serde_json::from_value(first).map(PushEvent::FileSharedWithMe)
            }
            "my_response" => serde_json::from_value(first).map(PushEvent::ServerGreeting),
            _ => {
                return PushEvent::Other {
                    name: name.to_string(),
                    args,
                }
            }
        };
        decoded.unwrap_or_else(|e| {
            tracing::warn!(event = name, error = %e, "push event payload has unexpected shape");
            PushEvent::Other {
                name: name.to_string(),
                args,
            }
        })
    }

    /// Lists to re-fetch after this event.
    pub fn refresh_targets(&self) -> &'static [RefreshTarget] {
        match self {
            PushEvent::NewFileUploaded(_) => &[RefreshTarget::DownloadCatalog],
            PushEvent::FileSharedWithMe(_) => {
                &[RefreshTarget::SharedFiles, RefreshTarget::DownloadCatalog]
            }
            _ => &[],
        }
    }

    /// One-line notification for the user, if the event deserves one.
    pub fn headline(&self) -> Option<String> {
        match self {
            PushEvent::NewFileUploaded(n) => Some(format!(
                "New file \"{}\" uploaded by {}",
                n.file.filename, n.uploader
            )),
            PushEvent::FileSharedWithMe(n) => Some(format!(
                "New file \"{}\" shared by {}!",
                n.file_info.filename, n.sender_username
            )),
            _ => None,
        }
    }
}
