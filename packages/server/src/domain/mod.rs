//! Domain layer: chat state, its invariants, and the ports the use cases
//! depend on.

pub mod entity;
pub mod error;
pub mod event;
pub mod history;
pub mod message_pusher;
pub mod presence;
pub mod registry;
pub mod repository;
pub mod room;
pub mod value_object;

pub use entity::{ChatMessage, MessageKind};
pub use error::{MessagePushError, RepositoryError, ValueObjectError};
pub use event::{Audience, ChatEvent, Delivery, InboundEvent, RejectReason};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
pub use message_pusher::{MessagePusher, PusherChannel};
pub use presence::PresenceCoordinator;
pub use registry::ConnectionRegistry;
pub use repository::ChatRepository;
pub use room::{ChatRoom, JoinSnapshot, LeaveSnapshot, MemberSnapshot, PostSnapshot};
pub use value_object::{
    ConnectionId, DISPLAY_NAME_MAX_CHARS, DisplayName, MESSAGE_BODY_MAX_CHARS, MessageBody,
    Timestamp,
};

#[cfg(test)]
pub use message_pusher::MockMessagePusher;
