//! UseCase: チャット参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 表示名の検証、レジストリへの登録、履歴の送信、参加通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加すると本人に履歴と人数、他の参加者に参加通知と人数が届く
//! - 異常系：空白のみ・21 文字の表示名、二重参加
//! - エッジケース：同じ表示名の参加者が複数いる

use std::sync::Arc;

use banter_shared::time::Clock;

use crate::domain::{
    Audience, ChatEvent, ChatRepository, ConnectionId, Delivery, DisplayName, MessagePusher,
    PresenceCoordinator, Timestamp,
};

use super::{
    error::JoinError,
    fanout::{EventSequencer, publish},
};

/// チャット参加のユースケース
pub struct JoinChatUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻取得（テスト時は固定時刻に差し替え）
    clock: Arc<dyn Clock>,
    /// 状態変更と配信の順序を揃えるゲート（ルーターが共有インスタンスを渡す）
    sequencer: Arc<EventSequencer>,
}

impl JoinChatUseCase {
    /// 新しい JoinChatUseCase を作成
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

    /// 参加を実行
    ///
    /// # Arguments
    ///
    /// * `connection_id` - 参加する接続の ID
    /// * `raw_name` - クライアントが送ってきた表示名（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(DisplayName)` - 参加成功（トリム済みの表示名）
    /// * `Err(JoinError)` - 参加失敗（状態は変更されない）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        raw_name: String,
    ) -> Result<DisplayName, JoinError> {
        // 1. 表示名の検証
        let name = DisplayName::new(raw_name)?;

        // 2. レジストリに登録し、履歴と参加者一覧のコピーを受け取る
        let _turn = self.sequencer.begin().await;
        let snapshot = self
            .repository
            .join(connection_id.clone(), name)
            .await
            .map_err(|_| JoinError::AlreadyJoined)?;

        // 3. 本人に履歴、他の参加者に参加通知、全員に人数を配信
        let now = Timestamp::new(self.clock.now_millis());
        let mut deliveries = vec![Delivery::new(
            ChatEvent::History(snapshot.history),
            Audience::Only(connection_id.clone()),
        )];
        deliveries.extend(PresenceCoordinator::joined(
            &connection_id,
            &snapshot.name,
            snapshot.count,
            now,
        ));
        publish(self.message_pusher.as_ref(), deliveries, &snapshot.members).await;

        Ok(snapshot.name)
    }
}
