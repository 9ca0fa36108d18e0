//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//! - 送信チャンネルの登録解除、レジストリからの削除、退出通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加済みの接続の切断で、残りの全員に退出通知と人数が届く
//! - エッジケース：参加前に切断した接続（何も通知されない）
//! - エッジケース：最後の参加者の切断（通知対象なし）

use std::sync::Arc;

use banter_shared::time::Clock;

use crate::domain::{
    ChatRepository, ConnectionId, DisplayName, MessagePusher, PresenceCoordinator, Timestamp,
};

use super::fanout::{EventSequencer, publish};

/// 切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn ChatRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 時刻取得（テスト時は固定時刻に差し替え）
    clock: Arc<dyn Clock>,
    /// 状態変更と配信の順序を揃えるゲート（ルーターが共有インスタンスを渡す）
    sequencer: Arc<EventSequencer>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
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

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 参加済みだった場合はその表示名、参加前の切断なら `None`
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<DisplayName> {
        let _turn = self.sequencer.begin().await;

        // 1. 送信チャンネルを登録解除（切断済みの接続には送らない）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. レジストリから削除（未参加なら何もしない）
        let snapshot = self.repository.leave(connection_id).await?;

        // 3. 残りの全員に退出通知と人数を配信
        let now = Timestamp::new(self.clock.now_millis());
        let deliveries = PresenceCoordinator::left(&snapshot.name, snapshot.count, now);
        publish(self.message_pusher.as_ref(), deliveries, &snapshot.members).await;

        Some(snapshot.name)
    }
}
