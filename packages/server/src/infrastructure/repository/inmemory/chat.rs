//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! `ChatRoom` 集約を 1 つの Mutex で保護し、全ての更新を直列化します。
//! 各メソッドはロック中に必要なデータをコピーして返すため、
//! 呼び出し側はロックを保持したままファンアウトする必要がありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMessage, ChatRepository, ChatRoom, ConnectionId, DisplayName, JoinSnapshot,
    LeaveSnapshot, MemberSnapshot, MessageBody, PostSnapshot, RepositoryError, Timestamp,
};

/// インメモリ Chat Repository 実装
pub struct InMemoryChatRepository {
    /// ChatRoom ドメインモデル（参加者レジストリ + メッセージ履歴）
    room: Arc<Mutex<ChatRoom>>,
}

impl InMemoryChatRepository {
    /// 新しい InMemoryChatRepository を作成
    pub fn new(room: Arc<Mutex<ChatRoom>>) -> Self {
        Self { room }
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn join(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
    ) -> Result<JoinSnapshot, RepositoryError> {
        let mut room = self.room.lock().await;
        room.join(connection_id, name)
    }

    async fn leave(&self, connection_id: &ConnectionId) -> Option<LeaveSnapshot> {
        let mut room = self.room.lock().await;
        room.leave(connection_id)
    }

    async fn post_message(
        &self,
        connection_id: &ConnectionId,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Result<PostSnapshot, RepositoryError> {
        let mut room = self.room.lock().await;
        room.post(connection_id, body, timestamp)
    }

    async fn find_member(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<MemberSnapshot, RepositoryError> {
        let room = self.room.lock().await;
        room.member(connection_id)
    }

    async fn count_members(&self) -> usize {
        let room = self.room.lock().await;
        room.registry().size()
    }

    async fn get_history(&self) -> Vec<ChatMessage> {
        let room = self.room.lock().await;
        room.history().snapshot()
    }
}
