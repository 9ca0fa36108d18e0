//! UseCase 層
//!
//! 受信イベントごとに 1 つのユースケースと、それらに振り分けるルーターを提供します。

mod connect_participant;
mod disconnect_participant;
mod error;
mod fanout;
mod join_chat;
mod relay_typing;
mod router;
mod send_message;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{JoinError, SendMessageError, TypingError};
pub use fanout::{EventSequencer, publish};
pub use join_chat::JoinChatUseCase;
pub use relay_typing::RelayTypingUseCase;
pub use router::{BroadcastRouter, RouterConfig};
pub use send_message::SendMessageUseCase;
