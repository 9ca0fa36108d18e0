//! Conversion logic between DTOs and domain values.

use banter_shared::time::timestamp_to_time_of_day;

use crate::domain::{ChatEvent, ChatMessage, InboundEvent, MessageKind};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain
// ========================================

impl From<dto::ClientMessage> for InboundEvent {
    fn from(dto: dto::ClientMessage) -> Self {
        match dto {
            dto::ClientMessage::Join { name } => InboundEvent::Join { name },
            dto::ClientMessage::Chat { body } => InboundEvent::Chat { body },
            dto::ClientMessage::Typing { typing } => InboundEvent::Typing { typing },
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<&ChatMessage> for dto::ChatMessageDto {
    fn from(model: &ChatMessage) -> Self {
        Self {
            kind: match model.kind {
                MessageKind::User => dto::MessageKindDto::User,
                MessageKind::System => dto::MessageKindDto::System,
            },
            author: model.author.as_ref().map(|name| name.as_str().to_string()),
            body: model.body.as_str().to_string(),
            timestamp: timestamp_to_time_of_day(model.timestamp.value()),
            sent_at: model.timestamp.value(),
            sender_id: model.sender_id.as_ref().map(|id| id.as_str().to_string()),
        }
    }
}

/// Encode a domain event as a JSON text frame.
pub fn encode_event(event: &ChatEvent) -> Result<String, serde_json::Error> {
    match event {
        ChatEvent::History(messages) => serde_json::to_string(&dto::HistoryMessage {
            r#type: dto::MessageType::History,
            messages: messages.iter().map(dto::ChatMessageDto::from).collect(),
        }),
        ChatEvent::Chat(message) => serde_json::to_string(&dto::ChatBroadcastMessage {
            r#type: dto::MessageType::Chat,
            message: message.into(),
        }),
        ChatEvent::Presence(message) => serde_json::to_string(&dto::PresenceMessage {
            r#type: dto::MessageType::Presence,
            message: message.into(),
        }),
        ChatEvent::Count(count) => serde_json::to_string(&dto::CountMessage {
            r#type: dto::MessageType::Count,
            count: *count,
        }),
        ChatEvent::Typing { name, typing } => serde_json::to_string(&dto::TypingMessage {
            r#type: dto::MessageType::Typing,
            name: name.as_str().to_string(),
            typing: *typing,
        }),
        ChatEvent::Rejected(reason) => serde_json::to_string(&dto::RejectedMessage {
            r#type: dto::MessageType::Rejected,
            reason: reason.as_str().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConnectionId, DisplayName, MessageBody, RejectReason, Timestamp};
    use serde_json::{Value, json};

    fn user_message() -> ChatMessage {
        ChatMessage::user(
            DisplayName::new("Alice".to_string()).unwrap(),
            ConnectionId::new("conn-a".to_string()).unwrap(),
            MessageBody::new("hi".to_string()).unwrap(),
            Timestamp::new(1672531200000),
        )
    }

    #[test]
    fn test_client_join_message_is_parsed() {
        // テスト項目: join メッセージが InboundEvent に変換される
        // given (前提条件):
        let raw = r#"{"type":"join","name":"Alice"}"#;

        // when (操作):
        let parsed: dto::ClientMessage = serde_json::from_str(raw).unwrap();
        let event: InboundEvent = parsed.into();

        // then (期待する結果):
        assert_eq!(
            event,
            InboundEvent::Join {
                name: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_client_typing_message_is_parsed() {
        // テスト項目: typing メッセージが InboundEvent に変換される
        // given (前提条件):
        let raw = r#"{"type":"typing","typing":true}"#;

        // when (操作):
        let parsed: dto::ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            InboundEvent::from(parsed),
            InboundEvent::Typing { typing: true }
        );
    }

    #[test]
    fn test_unknown_client_message_type_fails_to_parse() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let raw = r#"{"type":"kick","target":"Bob"}"#;

        // when (操作):
        let result = serde_json::from_str::<dto::ClientMessage>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_client_supplied_timestamp_is_ignored() {
        // テスト項目: クライアントが送った timestamp や author は無視される
        // given (前提条件):
        let raw = r#"{"type":"chat","body":"hi","timestamp":"00:00:00","author":"Mallory"}"#;

        // when (操作):
        let parsed: dto::ClientMessage = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            InboundEvent::from(parsed),
            InboundEvent::Chat {
                body: "hi".to_string()
            }
        );
    }

    #[test]
    fn test_chat_event_encoding() {
        // テスト項目: chat イベントが期待する JSON 形式にエンコードされる
        // given (前提条件):
        let event = ChatEvent::Chat(user_message());

        // when (操作):
        let json: Value = serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "chat");
        assert_eq!(json["message"]["kind"], "user");
        assert_eq!(json["message"]["author"], "Alice");
        assert_eq!(json["message"]["body"], "hi");
        assert_eq!(json["message"]["sender_id"], "conn-a");
        assert_eq!(json["message"]["sent_at"], 1672531200000i64);
        assert_eq!(json["message"]["timestamp"].as_str().unwrap().len(), 8);
    }

    #[test]
    fn test_system_message_omits_author_and_sender() {
        // テスト項目: システムメッセージには author と sender_id が含まれない
        // given (前提条件):
        let event = ChatEvent::Presence(ChatMessage::system(
            "Alice joined the chat".to_string(),
            Timestamp::new(0),
        ));

        // when (操作):
        let json: Value = serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "presence");
        assert_eq!(json["message"]["kind"], "system");
        assert!(json["message"].get("author").is_none());
        assert!(json["message"].get("sender_id").is_none());
    }

    #[test]
    fn test_count_typing_and_rejected_encoding() {
        // テスト項目: count / typing / rejected イベントのエンコード
        // given (前提条件):
        let count = ChatEvent::Count(3);
        let typing = ChatEvent::Typing {
            name: DisplayName::new("Bob".to_string()).unwrap(),
            typing: false,
        };
        let rejected = ChatEvent::Rejected(RejectReason::InvalidName);

        // when (操作):
        let count: Value = serde_json::from_str(&encode_event(&count).unwrap()).unwrap();
        let typing: Value = serde_json::from_str(&encode_event(&typing).unwrap()).unwrap();
        let rejected: Value = serde_json::from_str(&encode_event(&rejected).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(count, json!({"type": "count", "count": 3}));
        assert_eq!(typing, json!({"type": "typing", "name": "Bob", "typing": false}));
        assert_eq!(rejected, json!({"type": "rejected", "reason": "invalid_name"}));
    }

    #[test]
    fn test_history_encoding_keeps_order() {
        // テスト項目: history イベントは古い順にメッセージを含む
        // given (前提条件):
        let first = user_message();
        let second = ChatMessage::system("Bob left the chat".to_string(), Timestamp::new(1));
        let event = ChatEvent::History(vec![first, second]);

        // when (操作):
        let json: Value = serde_json::from_str(&encode_event(&event).unwrap()).unwrap();

        // then (期待する結果):
        assert_eq!(json["type"], "history");
        let messages = json["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["body"], "hi");
        assert_eq!(messages[1]["body"], "Bob left the chat");
    }
}
