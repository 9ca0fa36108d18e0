//! MessagePusher trait 定義
//!
//! クライアントへのイベント送信を抽象化します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{ChatEvent, ConnectionId, MessagePushError};

/// クライアントへの送信チャンネル（容量制限あり）
///
/// 遅いコンシューマとして切り離されたとき、`evicted` トークンがキャンセルされます。
/// 接続を持つ UI 層はこのトークンを監視し、通常の切断処理を開始します。
#[derive(Debug, Clone)]
pub struct PusherChannel {
    sender: mpsc::Sender<String>,
    evicted: CancellationToken,
}

impl PusherChannel {
    pub fn new(sender: mpsc::Sender<String>, evicted: CancellationToken) -> Self {
        Self { sender, evicted }
    }

    pub fn sender(&self) -> &mpsc::Sender<String> {
        &self.sender
    }

    /// 接続の切り離しを通知する
    pub fn evict(&self) {
        self.evicted.cancel();
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted.is_cancelled()
    }
}

impl From<mpsc::Sender<String>> for PusherChannel {
    fn from(sender: mpsc::Sender<String>) -> Self {
        Self::new(sender, CancellationToken::new())
    }
}

/// MessagePusher trait
///
/// 送信はノンブロッキングで行い、1 つの接続の遅延が他の接続に影響しないようにします。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, connection_id: ConnectionId, channel: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 特定のクライアントにイベントを送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;

    /// 複数のクライアントにイベントを送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError>;
}
