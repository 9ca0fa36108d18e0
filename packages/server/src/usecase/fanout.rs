//! 各ユースケース共通のファンアウト処理
//!
//! 状態変更とそれに伴うイベントのキュー投入は [`EventSequencer`] の 1 ターン内で
//! 行います。キュー投入は `try_send` のみでネットワーク書き込みを待たないため、
//! 各接続が受け取るイベントの順序は状態変更の順序と一致します。

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{Audience, ConnectionId, Delivery, MessagePusher};

/// 状態変更と配信キューへの投入を直列化するゲート
///
/// ルーターが 1 つ生成し、状態を変更・参照するユースケースで共有します。
#[derive(Debug, Default)]
pub struct EventSequencer {
    turn: Mutex<()>,
}

impl EventSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// ターンを取得する。ガードを破棄するまで他のユースケースは待機する
    pub async fn begin(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }
}

/// 各イベントを配信先に順番に送信する
///
/// 配信先はルームのロック中に取得した参加者一覧のコピーで解決します。
/// 1 接続への送信失敗は残りの配信を止めません。
pub async fn publish(
    message_pusher: &dyn MessagePusher,
    deliveries: Vec<Delivery>,
    members: &[ConnectionId],
) {
    for delivery in deliveries {
        match &delivery.audience {
            Audience::Only(target) => {
                if let Err(e) = message_pusher.push_to(target, &delivery.event).await {
                    tracing::warn!("Failed to push event to '{}': {}", target, e);
                }
            }
            audience => {
                let targets = audience.resolve(members);
                if targets.is_empty() {
                    continue;
                }
                if let Err(e) = message_pusher.broadcast(targets, &delivery.event).await {
                    tracing::warn!("Failed to broadcast event: {}", e);
                }
            }
        }
    }
}
