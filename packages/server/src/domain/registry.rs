//! Connection registry: the authoritative map of joined connections.

use std::collections::HashMap;

use super::value_object::{ConnectionId, DisplayName};

/// Maps each joined connection to its display name.
///
/// Only connections that completed a join appear here. Display names are not
/// required to be unique.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    names: HashMap<ConnectionId, DisplayName>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a display name to a connection, overwriting any previous name.
    pub fn register(&mut self, connection_id: ConnectionId, name: DisplayName) {
        self.names.insert(connection_id, name);
    }

    /// Remove a connection, returning the name it had bound.
    ///
    /// Returns `None` for a connection that never joined.
    pub fn unregister(&mut self, connection_id: &ConnectionId) -> Option<DisplayName> {
        self.names.remove(connection_id)
    }

    pub fn lookup(&self, connection_id: &ConnectionId) -> Option<&DisplayName> {
        self.names.get(connection_id)
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.names.contains_key(connection_id)
    }

    /// Number of joined connections.
    pub fn size(&self) -> usize {
        self.names.len()
    }

    /// Ids of all joined connections, in no particular order.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.names.keys().cloned().collect()
    }
}
