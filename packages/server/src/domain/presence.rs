//! Presence and typing event composition.
//!
//! Pure functions over registry state: they decide what to announce and to
//! whom, and leave the delivery to the caller.

use super::{
    entity::ChatMessage,
    event::{Audience, ChatEvent, Delivery},
    value_object::{ConnectionId, DisplayName, Timestamp},
};

/// Composes join, leave and typing announcements.
pub struct PresenceCoordinator;

impl PresenceCoordinator {
    /// Events for a connection that just joined.
    ///
    /// The announcement goes to everyone but the joiner; the new count goes
    /// to everyone.
    pub fn joined(
        joiner: &ConnectionId,
        name: &DisplayName,
        count: usize,
        at: Timestamp,
    ) -> Vec<Delivery> {
        vec![
            Delivery::new(
                ChatEvent::Presence(ChatMessage::system(Self::joined_text(name), at)),
                Audience::AllExcept(joiner.clone()),
            ),
            Delivery::new(ChatEvent::Count(count), Audience::All),
        ]
    }

    /// Events for a joined connection that went away.
    ///
    /// The connection is already gone from the registry, so `All` means
    /// everyone remaining.
    pub fn left(name: &DisplayName, count: usize, at: Timestamp) -> Vec<Delivery> {
        vec![
            Delivery::new(
                ChatEvent::Presence(ChatMessage::system(Self::left_text(name), at)),
                Audience::All,
            ),
            Delivery::new(ChatEvent::Count(count), Audience::All),
        ]
    }

    /// Relay a typing signal to everyone but the sender.
    pub fn typing(actor: &ConnectionId, name: &DisplayName, typing: bool) -> Vec<Delivery> {
        vec![Delivery::new(
            ChatEvent::Typing {
                name: name.clone(),
                typing,
            },
            Audience::AllExcept(actor.clone()),
        )]
    }

    pub fn joined_text(name: &DisplayName) -> String {
        format!("{} joined the chat", name)
    }

    pub fn left_text(name: &DisplayName) -> String {
        format!("{} left the chat", name)
    }
}
