//! WebSocket frame DTOs.
//!
//! Field order of every outbound frame is part of the client contract.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Value of the `type` field on typed outbound frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    ChatMessage,
    UserEvent,
    Notification,
}

/// Value of the `event` field on user-event frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserEventKind {
    UserJoined,
    UserLeft,
}

/// Value of the `status` field on acknowledgement frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AckStatus {
    Received,
}

/// Sender of a circle chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SenderInfo {
    pub username: String,
    pub id: i64,
}

/// `{"message": ..., "sender": {"username": ..., "id": ...}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircleChatFrame {
    pub message: String,
    pub sender: SenderInfo,
}

/// `{"type": "chat_message", "message": ..., "sender": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LobbyChatFrame {
    pub r#type: FrameType,
    pub message: String,
    pub sender: String,
}

/// `{"type": "user_event", "message": ..., "event": "user_joined" | "user_left"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserEventFrame {
    pub r#type: FrameType,
    pub message: String,
    pub event: UserEventKind,
}

/// `{"type": "notification", "data": ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationFrame {
    pub r#type: FrameType,
    pub data: Value,
}

/// `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    pub fn invalid_json() -> Self {
        Self {
            error: "Invalid JSON".to_string(),
        }
    }

    pub fn store_failed() -> Self {
        Self {
            error: "Message could not be stored".to_string(),
        }
    }
}

/// `{"status": "received"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AckFrame {
    pub status: AckStatus,
}

impl AckFrame {
    pub fn received() -> Self {
        Self {
            status: AckStatus::Received,
        }
    }
}

/// Any frame the gateway sends to a client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    CircleChat(CircleChatFrame),
    LobbyChat(LobbyChatFrame),
    UserEvent(UserEventFrame),
    Notification(NotificationFrame),
    Error(ErrorFrame),
    Ack(AckFrame),
}

impl OutboundFrame {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<ErrorFrame> for OutboundFrame {
    fn from(frame: ErrorFrame) -> Self {
        Self::Error(frame)
    }
}

impl From<AckFrame> for OutboundFrame {
    fn from(frame: AckFrame) -> Self {
        Self::Ack(frame)
    }
}

/// Inbound frame that could not be interpreted
#[derive(Debug, Error)]
pub enum MalformedFrame {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotAnObject,
}

/// Inbound chat frame: `{"message": "..."}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundChatFrame {
    pub message: String,
}

impl InboundChatFrame {
    /// Parse a text frame.
    ///
    /// A missing or non-string `message` field yields an empty message.
    pub fn from_text(raw: &str) -> Result<Self, MalformedFrame> {
        let Value::Object(fields) = serde_json::from_str::<Value>(raw)? else {
            return Err(MalformedFrame::NotAnObject);
        };
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Self { message })
    }
}
