//! The chat room aggregate: registry and history under one owner.
//!
//! Every mutating operation returns the copies the caller needs for fan-out,
//! so the lock guarding a room never has to be held while delivering.

use super::{
    entity::ChatMessage,
    error::RepositoryError,
    history::HistoryBuffer,
    registry::ConnectionRegistry,
    value_object::{ConnectionId, DisplayName, MessageBody, Timestamp},
};

/// State copied out of the room by a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinSnapshot {
    pub name: DisplayName,
    pub history: Vec<ChatMessage>,
    pub members: Vec<ConnectionId>,
    pub count: usize,
}

/// State copied out of the room when a joined connection leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveSnapshot {
    pub name: DisplayName,
    pub members: Vec<ConnectionId>,
    pub count: usize,
}

/// State copied out of the room by a posted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSnapshot {
    pub message: ChatMessage,
    pub members: Vec<ConnectionId>,
}

/// A joined connection's name together with the current members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSnapshot {
    pub name: DisplayName,
    pub members: Vec<ConnectionId>,
}

/// The single chat room served by this process.
#[derive(Debug, Clone, Default)]
pub struct ChatRoom {
    registry: ConnectionRegistry,
    history: HistoryBuffer,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history_capacity(capacity: usize) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            history: HistoryBuffer::with_capacity(capacity),
        }
    }

    /// Bind a name to a connection that has not joined yet.
    ///
    /// # Errors
    ///
    /// `RepositoryError::AlreadyJoined` if the connection already has a name.
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
        name: DisplayName,
    ) -> Result<JoinSnapshot, RepositoryError> {
        if self.registry.contains(&connection_id) {
            return Err(RepositoryError::AlreadyJoined(connection_id.into_string()));
        }
        self.registry.register(connection_id, name.clone());

        Ok(JoinSnapshot {
            name,
            history: self.history.snapshot(),
            members: self.registry.connection_ids(),
            count: self.registry.size(),
        })
    }

    /// Remove a connection. `None` if it never joined.
    pub fn leave(&mut self, connection_id: &ConnectionId) -> Option<LeaveSnapshot> {
        let name = self.registry.unregister(connection_id)?;
        Some(LeaveSnapshot {
            name,
            members: self.registry.connection_ids(),
            count: self.registry.size(),
        })
    }

    /// Record a message from a joined connection.
    ///
    /// The author is resolved from the registry at this moment.
    ///
    /// # Errors
    ///
    /// `RepositoryError::NotJoined` if the connection has no name.
    pub fn post(
        &mut self,
        connection_id: &ConnectionId,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Result<PostSnapshot, RepositoryError> {
        let author = self
            .registry
            .lookup(connection_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotJoined(connection_id.as_str().to_string()))?;

        let message = ChatMessage::user(author, connection_id.clone(), body, timestamp);
        self.history.append(message.clone());

        Ok(PostSnapshot {
            message,
            members: self.registry.connection_ids(),
        })
    }

    /// Name of a joined connection plus the current members.
    ///
    /// # Errors
    ///
    /// `RepositoryError::NotJoined` if the connection has no name.
    pub fn member(&self, connection_id: &ConnectionId) -> Result<MemberSnapshot, RepositoryError> {
        let name = self
            .registry
            .lookup(connection_id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotJoined(connection_id.as_str().to_string()))?;

        Ok(MemberSnapshot {
            name,
            members: self.registry.connection_ids(),
        })
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}
