//! Push-channel payloads (`GET /events`).
//!
//! Each server-sent event carries one JSON object:
//! `{"type": "snapshot" | "refresh" | "status_changed" | ..., "session_id"?, "status"?}`.

use serde::{Deserialize, Serialize};

use crate::SessionStatus;

/// Raw payload as sent on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PushMessage {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Classified push event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The server asks for a full re-fetch (`snapshot` or `refresh`).
    Resync,
    /// A single session changed status.
    StatusChanged {
        session_id: String,
        status: SessionStatus,
    },
    /// Anything else, including malformed payloads. Holds the type (or the
    /// raw data when it could not be decoded).
    Unrecognized(String),
}

impl PushEvent {
    /// Parse the `data` of one server-sent event.
    pub fn parse(data: &str) -> Self {
        match serde_json::from_str::<PushMessage>(data) {
            Ok(message) => Self::from(message),
            Err(_) => Self::Unrecognized(data.to_string()),
        }
    }
}

impl From<PushMessage> for PushEvent {
    fn from(message: PushMessage) -> Self {
        match message.kind.as_str() {
            "snapshot" | "refresh" => Self::Resync,
            "status_changed" => match message.session_id {
                Some(session_id) if !session_id.is_empty() => Self::StatusChanged {
                    session_id,
                    status: message.status.unwrap_or_default(),
                },
                _ => Self::Unrecognized(message.kind),
            },
            _ => Self::Unrecognized(message.kind),
        }
    }
}
