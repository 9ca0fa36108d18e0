//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信チャンネル（容量制限付き `mpsc::Sender`）を管理
//! - ドメインイベントを JSON にエンコードしてクライアントへ送信
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された sender を受け取り、`try_send` でのみ送信します。
//! バッファが一杯のクライアントは遅いコンシューマとしてマップから取り除き、
//! チャンネルの `evicted` トークンをキャンセルします。書き込みタスクが
//! 読まれないソケットで止まっていても、UI 層はトークンを見て切断処理に入ります。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{ChatEvent, ConnectionId, MessagePushError, MessagePusher, PusherChannel};
use crate::infrastructure::dto::conversion::encode_event;

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let clients = Arc::new(Mutex::new(HashMap::new()));
/// let pusher = WebSocketMessagePusher::new(clients.clone());
///
/// pusher.push_to(&connection_id, &ChatEvent::Count(1)).await?;
/// ```
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>) -> Self {
        Self { clients }
    }
}

/// 1 クライアントへ送信する。送信できないチャンネルはマップから取り除く。
fn deliver(
    clients: &mut HashMap<ConnectionId, PusherChannel>,
    connection_id: &ConnectionId,
    payload: String,
) -> Result<(), MessagePushError> {
    let Some(channel) = clients.get(connection_id) else {
        return Err(MessagePushError::ClientNotFound(
            connection_id.as_str().to_string(),
        ));
    };

    match channel.sender().try_send(payload) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => {
            if let Some(channel) = clients.remove(connection_id) {
                channel.evict();
            }
            Err(MessagePushError::SlowConsumer(
                connection_id.as_str().to_string(),
            ))
        }
        Err(TrySendError::Closed(_)) => {
            if let Some(channel) = clients.remove(connection_id) {
                channel.evict();
            }
            Err(MessagePushError::PushFailed(format!(
                "channel for '{}' is closed",
                connection_id
            )))
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, channel: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, channel);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        let payload = encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))?;

        let mut clients = self.clients.lock().await;
        deliver(&mut clients, connection_id, payload)?;
        tracing::debug!("Pushed event to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ChatEvent,
    ) -> Result<(), MessagePushError> {
        let payload = encode_event(event).map_err(|e| MessagePushError::Encode(e.to_string()))?;

        let mut clients = self.clients.lock().await;
        for target in targets {
            // ブロードキャストでは一部の送信失敗を許容
            match deliver(&mut clients, &target, payload.clone()) {
                Ok(()) => tracing::trace!("Broadcasted event to client '{}'", target),
                Err(MessagePushError::ClientNotFound(_)) => {
                    tracing::debug!("Client '{}' not found during broadcast, skipping", target);
                }
                Err(e) => tracing::warn!("Dropping client '{}': {}", target, e),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定のクライアントへの送信
    // - broadcast: 複数クライアントへの送信
    // - 遅いコンシューマ（バッファ満杯）の切り離し
    // - 閉じたチャンネルの除去
    //
    // 【なぜこのテストが必要か】
    // - 1 つの接続の遅延がサービス全体を止めないことを保証する
    // ========================================

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ConnectionId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    fn id(value: &str) -> ConnectionId {
        ConnectionId::new(value.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにイベントを JSON で送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::channel::<String>(8);
        pusher.register_client(id("alice"), tx.into()).await;

        // when (操作):
        let result = pusher.push_to(&id("alice"), &ChatEvent::Count(1)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(
            rx.recv().await,
            Some(r#"{"type":"count","count":1}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();

        // when (操作):
        let result = pusher.push_to(&id("nobody"), &ChatEvent::Count(1)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::ClientNotFound("nobody".to_string()))
        );
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のクライアントにブロードキャストできる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel::<String>(8);
        let (tx2, mut rx2) = mpsc::channel::<String>(8);
        pusher.register_client(id("alice"), tx1.into()).await;
        pusher.register_client(id("bob"), tx2.into()).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![id("alice"), id("bob")], &ChatEvent::Count(2))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        let expected = Some(r#"{"type":"count","count":2}"#.to_string());
        assert_eq!(rx1.recv().await, expected);
        assert_eq!(rx2.recv().await, expected);
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: 一部のクライアントが存在しなくてもブロードキャストは成功する
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel::<String>(8);
        pusher.register_client(id("alice"), tx1.into()).await;

        // when (操作):
        let result = pusher
            .broadcast(vec![id("alice"), id("ghost")], &ChatEvent::Count(1))
            .await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(rx1.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_slow_consumer_is_dropped() {
        // テスト項目: バッファが一杯のクライアントは切り離され、他は影響を受けない
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (slow_tx, mut slow_rx) = mpsc::channel::<String>(1);
        let (fast_tx, mut fast_rx) = mpsc::channel::<String>(8);
        let slow_evicted = CancellationToken::new();
        let fast_evicted = CancellationToken::new();
        pusher
            .register_client(id("slow"), PusherChannel::new(slow_tx, slow_evicted.clone()))
            .await;
        pusher
            .register_client(id("fast"), PusherChannel::new(fast_tx, fast_evicted.clone()))
            .await;

        // when (操作): slow は 1 件しか溜められない
        let targets = vec![id("slow"), id("fast")];
        pusher
            .broadcast(targets.clone(), &ChatEvent::Count(1))
            .await
            .unwrap();
        pusher.broadcast(targets, &ChatEvent::Count(2)).await.unwrap();

        // then (期待する結果):
        assert!(!clients.lock().await.contains_key(&id("slow")));
        assert!(clients.lock().await.contains_key(&id("fast")));
        assert!(slow_evicted.is_cancelled());
        assert!(!fast_evicted.is_cancelled());
        assert!(fast_rx.recv().await.is_some());
        assert!(fast_rx.recv().await.is_some());
        // slow は 1 件受け取った後、sender が破棄されてチャンネルが閉じる
        assert!(slow_rx.recv().await.is_some());
        assert_eq!(slow_rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_push_to_full_channel_reports_slow_consumer() {
        // テスト項目: 個別送信でバッファが一杯なら SlowConsumer エラーになる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, _rx) = mpsc::channel::<String>(1);
        pusher.register_client(id("slow"), tx.into()).await;
        pusher.push_to(&id("slow"), &ChatEvent::Count(1)).await.unwrap();

        // when (操作):
        let result = pusher.push_to(&id("slow"), &ChatEvent::Count(2)).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(MessagePushError::SlowConsumer("slow".to_string()))
        );
    }

    #[tokio::test]
    async fn test_eviction_fires_while_receiver_is_still_alive() {
        // テスト項目: 受信側が生きたまま読まなくなっても、切り離し通知が届く
        // given (前提条件): 受信側は保持したまま一切読まない
        let (pusher, _clients) = create_test_pusher();
        let (tx, _stalled_rx) = mpsc::channel::<String>(2);
        let evicted = CancellationToken::new();
        pusher
            .register_client(id("stalled"), PusherChannel::new(tx, evicted.clone()))
            .await;

        // when (操作):
        for count in 0..3 {
            let _ = pusher.push_to(&id("stalled"), &ChatEvent::Count(count)).await;
        }

        // then (期待する結果):
        tokio::time::timeout(std::time::Duration::from_secs(1), evicted.cancelled())
            .await
            .expect("eviction was not signalled");
    }

    #[tokio::test]
    async fn test_closed_channel_is_removed() {
        // テスト項目: 受信側が閉じたチャンネルはマップから取り除かれる
        // given (前提条件):
        let (pusher, clients) = create_test_pusher();
        let (tx, rx) = mpsc::channel::<String>(8);
        pusher.register_client(id("gone"), tx.into()).await;
        drop(rx);

        // when (操作):
        let result = pusher.broadcast(vec![id("gone")], &ChatEvent::Count(0)).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert!(clients.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_unregister_client() {
        // テスト項目: 登録解除したクライアントには送信されない
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, _rx) = mpsc::channel::<String>(8);
        pusher.register_client(id("alice"), tx.into()).await;

        // when (操作):
        pusher.unregister_client(&id("alice")).await;
        let result = pusher.push_to(&id("alice"), &ChatEvent::Count(0)).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }
}
