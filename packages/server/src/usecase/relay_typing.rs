//! UseCase: 入力中シグナルの中継
//!
//! サーバーは状態を持たず、受け取った値をそのまま送信者以外の参加者へ中継します。

use std::sync::Arc;

use crate::domain::{ChatRepository, ConnectionId, MessagePusher, PresenceCoordinator};

use super::{
    error::TypingError,
    fanout::{EventSequencer, publish},
};

/// 入力中シグナル中継のユースケース
pub struct RelayTypingUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 状態変更と配信の順序を揃えるゲート（ルーターが共有インスタンスを渡す）
    sequencer: Arc<EventSequencer>,
}

impl RelayTypingUseCase {
    /// 新しい RelayTypingUseCase を作成
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            sequencer: Arc::new(EventSequencer::new()),
        }
    }

    /// 他のユースケースと共有するシーケンサーを設定
    pub fn with_sequencer(mut self, sequencer: Arc<EventSequencer>) -> Self {
        self.sequencer = sequencer;
        self
    }

    /// 入力中シグナルを中継する
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        typing: bool,
    ) -> Result<(), TypingError> {
        let _turn = self.sequencer.begin().await;
        let member = self
            .repository
            .find_member(connection_id)
            .await
            .map_err(|_| TypingError::NotJoined)?;

        let deliveries = PresenceCoordinator::typing(connection_id, &member.name, typing);
        publish(self.message_pusher.as_ref(), deliveries, &member.members).await;

        Ok(())
    }
}
