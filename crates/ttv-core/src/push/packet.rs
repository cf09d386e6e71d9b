//! Engine.IO v4 and Socket.IO v5 packet codec (text packets only).
//!
//! A polling payload is a list of Engine.IO packets separated by `\x1e`.
//! Each packet is a type digit followed by data; Engine.IO `message` packets
//! carry Socket.IO packets such as `2["event",{...}]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::PushError;

/// Separator between packets in one polling payload.
pub const RECORD_SEPARATOR: char = '\u{1e}';

/// Data of the Engine.IO `open` packet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    pub sid: String,
    #[serde(default)]
    pub upgrades: Vec<String>,
    /// Milliseconds between server pings.
    pub ping_interval: u64,
    /// Milliseconds the server waits for a pong.
    pub ping_timeout: u64,
    #[serde(default)]
    pub max_payload: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePacket {
    Open(OpenInfo),
    Close,
    Ping(String),
    Pong(String),
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(s: &str) -> Result<Self, PushError> {
        let mut chars = s.chars();
        let kind = chars
            .next()
            .ok_or_else(|| PushError::malformed(s, "empty packet"))?;
        let data = chars.as_str();
        match kind {
            '0' => serde_json::from_str(data)
                .map(EnginePacket::Open)
                .map_err(|e| PushError::malformed(s, e.to_string())),
            '1' => Ok(EnginePacket::Close),
            '2' => Ok(EnginePacket::Ping(data.to_string())),
            '3' => Ok(EnginePacket::Pong(data.to_string())),
            '4' => Ok(EnginePacket::Message(data.to_string())),
            '5' => Ok(EnginePacket::Upgrade),
            '6' => Ok(EnginePacket::Noop),
            'b' => Err(PushError::Unsupported("binary engine packet".to_string())),
            other => Err(PushError::malformed(s, format!("unknown type {other:?}"))),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(info) => {
                format!("0{}", serde_json::to_string(info).unwrap_or_default())
            }
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(d) => format!("2{d}"),
            EnginePacket::Pong(d) => format!("3{d}"),
            EnginePacket::Message(m) => format!("4{m}"),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

/// Splits a polling response body into packets.
pub fn decode_payload(body: &str) -> Result<Vec<EnginePacket>, PushError> {
    body.split(RECORD_SEPARATOR)
        .filter(|p| !p.is_empty())
        .map(EnginePacket::decode)
        .collect()
}

/// Joins packets into one polling request body.
pub fn encode_payload(packets: &[EnginePacket]) -> String {
    packets
        .iter()
        .map(EnginePacket::encode)
        .collect::<Vec<_>>()
        .join(&RECORD_SEPARATOR.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect(Option<Value>),
    Disconnect,
    Event {
        name: String,
        args: Vec<Value>,
        ack_id: Option<u64>,
    },
    Ack {
        id: u64,
        args: Vec<Value>,
    },
    ConnectError(Value),
}

impl SocketPacket {
    /// Decodes a Socket.IO packet; returns its namespace (`/` by default) too.
    pub fn decode(s: &str) -> Result<(String, SocketPacket), PushError> {
        let mut chars = s.chars();
        let kind = chars
            .next()
            .ok_or_else(|| PushError::malformed(s, "empty packet"))?;
        if matches!(kind, '5' | '6') {
            return Err(PushError::Unsupported("binary socket packet".to_string()));
        }
        let mut rest = chars.as_str();

        let mut namespace = "/".to_string();
        if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            namespace = rest[..end].to_string();
            rest = rest.get(end + 1..).unwrap_or("");
        }

        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        let ack_id = if digits > 0 {
            Some(
                rest[..digits]
                    .parse::<u64>()
                    .map_err(|e| PushError::malformed(s, e.to_string()))?,
            )
        } else {
            None
        };
        let rest = &rest[digits..];

        let data: Option<Value> = if rest.is_empty() {
            None
        } else {
            Some(serde_json::from_str(rest).map_err(|e| PushError::malformed(s, e.to_string()))?)
        };

        let packet = match kind {
            '0' => SocketPacket::Connect(data),
            '1' => SocketPacket::Disconnect,
            '2' => {
                let mut args = match data {
                    Some(Value::Array(a)) => a,
                    _ => return Err(PushError::malformed(s, "event data is not an array")),
                };
                if args.is_empty() {
                    return Err(PushError::malformed(s, "event without name"));
                }
                let name = match args.remove(0) {
                    Value::String(n) => n,
                    _ => return Err(PushError::malformed(s, "event name is not a string")),
                };
                SocketPacket::Event { name, args, ack_id }
            }
            '3' => {
                let id = ack_id.ok_or_else(|| PushError::malformed(s, "ack without id"))?;
                let args = match data {
                    Some(Value::Array(a)) => a,
                    _ => Vec::new(),
                };
                SocketPacket::Ack { id, args }
            }
            '4' => SocketPacket::ConnectError(data.unwrap_or(Value::Null)),
            other => return Err(PushError::malformed(s, format!("unknown type {other:?}"))),
        };
        Ok((namespace, packet))
    }

    /// Client packet joining the default namespace.
    pub fn connect_default() -> String {
        "0".to_string()
    }

    /// Client packet leaving the default namespace.
    pub fn disconnect_default() -> String {
        "1".to_string()
    }
}
