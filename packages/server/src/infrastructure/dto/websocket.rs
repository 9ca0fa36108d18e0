//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame carrying a `type` field.

use serde::{Deserialize, Serialize};

/// Inbound message from a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join { name: String },
    Chat { body: String },
    Typing { typing: bool },
}

/// Outbound message type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    History,
    Chat,
    Presence,
    Count,
    Typing,
    Rejected,
}

/// Kind of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKindDto {
    User,
    System,
}

/// A chat message as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageDto {
    pub kind: MessageKindDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub body: String,
    /// Server receipt time as `HH:MM:SS`
    pub timestamp: String,
    /// Server receipt time as Unix milliseconds
    pub sent_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<String>,
}

/// Retained history, sent once after a successful join
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub r#type: MessageType,
    pub messages: Vec<ChatMessageDto>,
}

/// A participant's chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatBroadcastMessage {
    pub r#type: MessageType,
    pub message: ChatMessageDto,
}

/// Join or leave announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceMessage {
    pub r#type: MessageType,
    pub message: ChatMessageDto,
}

/// Number of joined participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountMessage {
    pub r#type: MessageType,
    pub count: usize,
}

/// Typing indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingMessage {
    pub r#type: MessageType,
    pub name: String,
    pub typing: bool,
}

/// Notice that an inbound message was dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedMessage {
    pub r#type: MessageType,
    pub reason: String,
}
