//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    ChatMessage, ConnectionId, DisplayName, JoinSnapshot, LeaveSnapshot, MemberSnapshot,
    MessageBody, PostSnapshot, RepositoryError, Timestamp,
};

/// Chat Repository trait
///
/// 参加者レジストリとメッセージ履歴へのインターフェース。
/// 各メソッドは 1 つのクリティカルセクションとして実行され、
/// ファンアウトに必要なデータのコピーを返します。
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// 接続に表示名を紐づけて参加させる
    async fn join(
        &self,
        connection_id: ConnectionId,
        name: DisplayName,
    ) -> Result<JoinSnapshot, RepositoryError>;

    /// 接続を削除する（未参加の場合は `None`）
    async fn leave(&self, connection_id: &ConnectionId) -> Option<LeaveSnapshot>;

    /// メッセージを履歴に追加する
    async fn post_message(
        &self,
        connection_id: &ConnectionId,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Result<PostSnapshot, RepositoryError>;

    /// 参加済みの接続の表示名と、現在の参加者一覧を取得
    async fn find_member(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<MemberSnapshot, RepositoryError>;

    /// 参加済みの接続数を取得
    async fn count_members(&self) -> usize;

    /// 保持しているメッセージ履歴を取得（古い順）
    async fn get_history(&self) -> Vec<ChatMessage>;
}
