//! Domain layer errors.

use thiserror::Error;

/// Value object construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Connection id is empty
    #[error("Connection id cannot be empty")]
    ConnectionIdEmpty,

    /// Display name is empty after trimming
    #[error("Display name cannot be empty")]
    DisplayNameEmpty,

    /// Display name exceeds the maximum length
    #[error("Display name is too long: {actual} characters (max {max})")]
    DisplayNameTooLong { max: usize, actual: usize },

    /// Message body is empty after trimming
    #[error("Message body cannot be empty")]
    MessageBodyEmpty,

    /// Message body exceeds the maximum length
    #[error("Message body is too long: {actual} characters (max {max})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The connection has not bound a display name yet
    #[error("Connection '{0}' has not joined the chat")]
    NotJoined(String),

    /// The connection already bound a display name
    #[error("Connection '{0}' has already joined the chat")]
    AlreadyJoined(String),
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// No outbound channel is registered for the connection
    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    /// The outbound channel is closed
    #[error("Failed to push message: {0}")]
    PushFailed(String),

    /// The outbound buffer is full; the consumer was dropped
    #[error("Client '{0}' is too slow and was disconnected")]
    SlowConsumer(String),

    /// The event could not be encoded for the wire
    #[error("Failed to encode event: {0}")]
    Encode(String),
}
