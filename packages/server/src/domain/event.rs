//! Outbound events and their audiences.
//!
//! Use cases never write to connections directly. They produce a list of
//! [`Delivery`] values, each an event paired with the audience that should
//! receive it, and hand that list to the fan-out step.

use super::{
    entity::ChatMessage,
    value_object::{ConnectionId, DisplayName},
};

/// Event received from a connection, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Join { name: String },
    Chat { body: String },
    Typing { typing: bool },
}

/// Event sent from the server to one or more connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Retained history, pushed once to a newly joined connection
    History(Vec<ChatMessage>),
    /// A participant's message
    Chat(ChatMessage),
    /// A join or leave announcement
    Presence(ChatMessage),
    /// Number of joined connections
    Count(usize),
    /// Typing indicator of another participant
    Typing { name: DisplayName, typing: bool },
    /// Notice that an inbound event was dropped
    Rejected(RejectReason),
}

/// Why an inbound event was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    InvalidName,
    InvalidMessage,
    AlreadyJoined,
    NotJoined,
    Malformed,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::InvalidName => "invalid_name",
            RejectReason::InvalidMessage => "invalid_message",
            RejectReason::AlreadyJoined => "already_joined",
            RejectReason::NotJoined => "not_joined",
            RejectReason::Malformed => "malformed",
        }
    }
}

/// Set of connections an event is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// Every joined connection
    All,
    /// Every joined connection except the actor
    AllExcept(ConnectionId),
    /// A single connection, joined or not
    Only(ConnectionId),
}

impl Audience {
    /// Resolve the audience against a snapshot of joined connections.
    pub fn resolve(&self, members: &[ConnectionId]) -> Vec<ConnectionId> {
        match self {
            Audience::All => members.to_vec(),
            Audience::AllExcept(excluded) => members
                .iter()
                .filter(|id| *id != excluded)
                .cloned()
                .collect(),
            Audience::Only(target) => vec![target.clone()],
        }
    }
}

/// An event paired with its audience.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: ChatEvent,
    pub audience: Audience,
}

impl Delivery {
    pub fn new(event: ChatEvent, audience: Audience) -> Self {
        Self { event, audience }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<ConnectionId> {
        values
            .iter()
            .map(|v| ConnectionId::new(v.to_string()).unwrap())
            .collect()
    }

    #[test]
    fn test_audience_all_returns_every_member() {
        // テスト項目: All は全メンバーに解決される
        // given (前提条件):
        let members = ids(&["a", "b", "c"]);

        // when (操作):
        let targets = Audience::All.resolve(&members);

        // then (期待する結果):
        assert_eq!(targets, members);
    }

    #[test]
    fn test_audience_all_except_skips_actor() {
        // テスト項目: AllExcept は指定した接続を除いたメンバーに解決される
        // given (前提条件):
        let members = ids(&["a", "b", "c"]);
        let actor = ConnectionId::new("b".to_string()).unwrap();

        // when (操作):
        let targets = Audience::AllExcept(actor).resolve(&members);

        // then (期待する結果):
        assert_eq!(targets, ids(&["a", "c"]));
    }

    #[test]
    fn test_audience_only_ignores_membership() {
        // テスト項目: Only はメンバーでない接続にも解決される
        // given (前提条件):
        let members = ids(&["a"]);
        let outsider = ConnectionId::new("z".to_string()).unwrap();

        // when (操作):
        let targets = Audience::Only(outsider.clone()).resolve(&members);

        // then (期待する結果):
        assert_eq!(targets, vec![outsider]);
    }

    #[test]
    fn test_reject_reason_wire_names() {
        // テスト項目: 拒否理由の文字列表現
        // given (前提条件):
        let reasons = [
            RejectReason::InvalidName,
            RejectReason::InvalidMessage,
            RejectReason::AlreadyJoined,
            RejectReason::NotJoined,
            RejectReason::Malformed,
        ];

        // when (操作):
        let names: Vec<&str> = reasons.iter().map(|r| r.as_str()).collect();

        // then (期待する結果):
        assert_eq!(
            names,
            vec![
                "invalid_name",
                "invalid_message",
                "already_joined",
                "not_joined",
                "malformed"
            ]
        );
    }
}
