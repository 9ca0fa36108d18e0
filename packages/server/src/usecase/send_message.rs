//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 本文の検証、履歴への追加、送信者を含む全員へのブロードキャスト
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者自身を含む全員にメッセージが届く
//! - 異常系：501 文字・空白のみの本文、未参加の接続からの送信
//! - エッジケース：送信者のみが参加している場合

use std::sync::Arc;

use banter_shared::time::Clock;

use crate::domain::{
    Audience, ChatEvent, ChatMessage, ChatRepository, ConnectionId, Delivery, MessageBody,
    MessagePusher, Timestamp,
};

use super::{
    error::SendMessageError,
    fanout::{EventSequencer, publish},
};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻取得（受信時刻はサーバー側で付与する）
    clock: Arc<dyn Clock>,
    /// 状態変更と配信の順序を揃えるゲート（ルーターが共有インスタンスを渡す）
    sequencer: Arc<EventSequencer>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
            sequencer: Arc::new(EventSequencer::new()),
        }
    }

    /// 他のユースケースと共有するシーケンサーを設定
    pub fn with_sequencer(mut self, sequencer: Arc<EventSequencer>) -> Self {
        self.sequencer = sequencer;
        self
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 送信者の接続 ID
    /// * `raw_body` - クライアントが送ってきた本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 履歴に追加され、全員に配信されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗（履歴は変更されない）
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        raw_body: String,
    ) -> Result<ChatMessage, SendMessageError> {
        // 1. 本文の検証
        let body = MessageBody::new(raw_body)?;

        // 2. 履歴に追加（送信者名はこの時点のレジストリから解決）
        let _turn = self.sequencer.begin().await;
        let timestamp = Timestamp::new(self.clock.now_millis());
        let snapshot = self
            .repository
            .post_message(connection_id, body, timestamp)
            .await
            .map_err(|_| SendMessageError::NotJoined)?;

        // 3. 送信者を含む全員にブロードキャスト
        let deliveries = vec![Delivery::new(
            ChatEvent::Chat(snapshot.message.clone()),
            Audience::All,
        )];
        publish(self.message_pusher.as_ref(), deliveries, &snapshot.members).await;

        Ok(snapshot.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ChatRoom, DisplayName, MESSAGE_BODY_MAX_CHARS, MessageKind, MockMessagePusher,
            PusherChannel,
        },
        infrastructure::repository::InMemoryChatRepository,
    };
    use banter_shared::time::FixedClock;
    use std::sync::Mutex as StdMutex;
    use tokio::sync::Mutex;

    // テスト用の MessagePusher（送信内容を記録する）
    #[derive(Default)]
    struct RecordingMessagePusher {
        broadcasts: StdMutex<Vec<(Vec<ConnectionId>, ChatEvent)>>,
    }

    #[async_trait::async_trait]
    impl MessagePusher for RecordingMessagePusher {
        async fn register_client(&self, _connection_id: ConnectionId, _sender: PusherChannel) {
            // No-op for mock
        }

        async fn unregister_client(&self, _connection_id: &ConnectionId) {
            // No-op for mock
        }

        async fn push_to(
            &self,
            _connection_id: &ConnectionId,
            _event: &ChatEvent,
        ) -> Result<(), crate::domain::MessagePushError> {
            Ok(())
        }

        async fn broadcast(
            &self,
            targets: Vec<ConnectionId>,
            event: &ChatEvent,
        ) -> Result<(), crate::domain::MessagePushError> {
            self.broadcasts
                .lock()
                .unwrap()
                .push((targets, event.clone()));
            Ok(())
        }
    }

    fn create_test_repository() -> Arc<InMemoryChatRepository> {
        Arc::new(InMemoryChatRepository::new(Arc::new(Mutex::new(
            ChatRoom::new(),
        ))))
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    async fn join(repository: &InMemoryChatRepository, connection: &str, name: &str) {
        repository
            .join(id(connection), DisplayName::new(name.to_string()).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_send_message_broadcasts_to_everyone_including_sender() {
        // テスト項目: メッセージは送信者を含む全員にブロードキャストされる
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingMessagePusher::default());
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(7_000)),
        );
        join(&repository, "a", "Alice").await;
        join(&repository, "b", "Bob").await;

        // when (操作):
        let message = usecase.execute(&id("a"), "hi".to_string()).await.unwrap();

        // then (期待する結果):
        assert_eq!(message.kind, MessageKind::User);
        assert_eq!(message.author.as_ref().unwrap().as_str(), "Alice");
        assert_eq!(message.body.as_str(), "hi");
        assert_eq!(message.sender_id, Some(id("a")));
        assert_eq!(message.timestamp, Timestamp::new(7_000));

        let broadcasts = pusher.broadcasts.lock().unwrap();
        assert_eq!(broadcasts.len(), 1);
        let (targets, event) = &broadcasts[0];
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&id("a")));
        assert!(targets.contains(&id("b")));
        assert_eq!(event, &ChatEvent::Chat(message.clone()));
    }

    #[tokio::test]
    async fn test_send_message_only_sender_joined() {
        // テスト項目: 送信者のみが参加している場合でも本人に届き、履歴に追加される
        // given (前提条件):
        let repository = create_test_repository();
        let pusher = Arc::new(RecordingMessagePusher::default());
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        );
        join(&repository, "a", "Alice").await;

        // when (操作):
        let result = usecase.execute(&id("a"), "Hello!".to_string()).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(pusher.broadcasts.lock().unwrap()[0].0, vec![id("a")]);
        assert_eq!(repository.get_history().await.len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_message_is_dropped() {
        // テスト項目: 501 文字のメッセージはブロードキャストされず、履歴も変わらない
        // given (前提条件):
        let repository = create_test_repository();
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        pusher.expect_push_to().never();
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );
        join(&repository, "a", "Alice").await;

        // when (操作):
        let body = "x".repeat(MESSAGE_BODY_MAX_CHARS + 1);
        let result = usecase.execute(&id("a"), body).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SendMessageError::InvalidMessage(_))));
        assert!(repository.get_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_message_is_dropped() {
        // テスト項目: 空白のみのメッセージは破棄される
        // given (前提条件):
        let repository = create_test_repository();
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );
        join(&repository, "a", "Alice").await;

        // when (操作):
        let result = usecase.execute(&id("a"), "   ".to_string()).await;

        // then (期待する結果):
        assert!(matches!(result, Err(SendMessageError::InvalidMessage(_))));
        assert!(repository.get_history().await.is_empty());
    }

    #[tokio::test]
    async fn test_message_from_unjoined_connection_is_dropped() {
        // テスト項目: 未参加の接続からのメッセージは破棄される
        // given (前提条件):
        let repository = create_test_repository();
        let mut pusher = MockMessagePusher::new();
        pusher.expect_broadcast().never();
        let usecase = SendMessageUseCase::new(
            repository.clone(),
            Arc::new(pusher),
            Arc::new(FixedClock::new(0)),
        );

        // when (操作):
        let result = usecase.execute(&id("ghost"), "hi".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::NotJoined));
        assert!(repository.get_history().await.is_empty());
    }
}
