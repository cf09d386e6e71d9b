//! Live push channel.
//!
//! The server broadcasts `new_file_uploaded` to everyone and sends
//! `file_shared_with_me` to the receiving user over Socket.IO. This module
//! speaks Engine.IO v4 over HTTP long-polling (no WebSocket upgrade), decodes
//! the events into [`PushEvent`]s and hands them to the caller over a tokio
//! mpsc channel.

mod error;
mod event;
mod listener;
mod packet;

pub use error::PushError;
pub use event::{Greeting, NewFileNotice, PushEvent, RefreshTarget, SharedWithMeNotice};
pub use listener::PushListener;
pub use packet::{decode_payload, encode_payload, EnginePacket, OpenInfo, SocketPacket};
