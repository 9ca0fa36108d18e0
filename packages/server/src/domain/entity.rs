//! Entities of the chat domain.

use super::value_object::{ConnectionId, DisplayName, MessageBody, Timestamp};

/// Discriminator between participant-authored and server-authored messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    User,
    System,
}

/// A chat message. Immutable once created.
///
/// `author` is the display name at send time and is never re-resolved, so
/// history keeps the original name after the author disconnects. System
/// messages have neither `author` nor `sender_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub kind: MessageKind,
    pub author: Option<DisplayName>,
    pub body: MessageBody,
    pub timestamp: Timestamp,
    pub sender_id: Option<ConnectionId>,
}

impl ChatMessage {
    /// Create a message sent by a joined participant
    pub fn user(
        author: DisplayName,
        sender_id: ConnectionId,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            kind: MessageKind::User,
            author: Some(author),
            body,
            timestamp,
            sender_id: Some(sender_id),
        }
    }

    /// Create a server-authored announcement
    pub fn system(text: String, timestamp: Timestamp) -> Self {
        Self {
            kind: MessageKind::System,
            author: None,
            body: MessageBody::system(text),
            timestamp,
            sender_id: None,
        }
    }
}
