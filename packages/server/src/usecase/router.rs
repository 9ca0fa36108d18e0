//! ブロードキャストルーター: すべての受信イベントの入口
//!
//! 接続は `Connected → Joined → Disconnected` と遷移します。ルーター自身は
//! この状態を持たず、レジストリに表示名が登録されているかどうかで判定します。
//! 判定と操作は同じクリティカルセクション内で行われます。
//!
//! 不正なイベントは破棄します。`notify_rejections` が有効な場合のみ、
//! 送信元の接続に `rejected` を返します。他の接続には一切通知しません。

use std::sync::Arc;

use banter_shared::time::Clock;

use crate::domain::{
    ChatEvent, ChatRepository, ConnectionId, InboundEvent, MessagePusher, PusherChannel,
    RejectReason,
};

use super::{
    ConnectParticipantUseCase, DisconnectParticipantUseCase, EventSequencer, JoinChatUseCase,
    RelayTypingUseCase, SendMessageUseCase,
};

/// ルーターの動作設定
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterConfig {
    /// 破棄したイベントの送信元に `rejected{reason}` を返す
    pub notify_rejections: bool,
}

/// 受信イベントを各ユースケースに振り分ける
pub struct BroadcastRouter {
    connect_participant: ConnectParticipantUseCase,
    join_chat: JoinChatUseCase,
    send_message: SendMessageUseCase,
    relay_typing: RelayTypingUseCase,
    disconnect_participant: DisconnectParticipantUseCase,
    message_pusher: Arc<dyn MessagePusher>,
    config: RouterConfig,
}

impl BroadcastRouter {
    /// 新しい BroadcastRouter を作成
    ///
    /// 状態を扱うユースケースはすべて 1 つの [`EventSequencer`] を共有します。
    pub fn new(
        repository: Arc<dyn ChatRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
        config: RouterConfig,
    ) -> Self {
        let sequencer = Arc::new(EventSequencer::new());
        Self {
            connect_participant: ConnectParticipantUseCase::new(message_pusher.clone()),
            join_chat: JoinChatUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )
            .with_sequencer(sequencer.clone()),
            send_message: SendMessageUseCase::new(
                repository.clone(),
                message_pusher.clone(),
                clock.clone(),
            )
            .with_sequencer(sequencer.clone()),
            relay_typing: RelayTypingUseCase::new(repository.clone(), message_pusher.clone())
                .with_sequencer(sequencer.clone()),
            disconnect_participant: DisconnectParticipantUseCase::new(
                repository,
                message_pusher.clone(),
                clock,
            )
            .with_sequencer(sequencer),
            message_pusher,
            config,
        }
    }

    /// 接続が開かれた
    pub async fn connect(&self, connection_id: ConnectionId, channel: PusherChannel) {
        tracing::debug!("Connection '{}' opened", connection_id);
        self.connect_participant
            .execute(connection_id, channel)
            .await;
    }

    /// 受信イベントを 1 件処理する
    ///
    /// # Errors
    ///
    /// イベントを破棄した理由を返します。状態は変更されず、他の接続にも通知されません。
    pub async fn handle(
        &self,
        connection_id: &ConnectionId,
        event: InboundEvent,
    ) -> Result<(), RejectReason> {
        let result = match event {
            InboundEvent::Join { name } => self
                .join_chat
                .execute(connection_id.clone(), name)
                .await
                .map(|name| tracing::info!("{} joined the chat", name))
                .map_err(RejectReason::from),
            InboundEvent::Chat { body } => self
                .send_message
                .execute(connection_id, body)
                .await
                .map(|message| {
                    tracing::info!(
                        "{}: {}",
                        message.author.as_ref().map(|a| a.as_str()).unwrap_or(""),
                        message.body.as_str()
                    )
                })
                .map_err(RejectReason::from),
            InboundEvent::Typing { typing } => self
                .relay_typing
                .execute(connection_id, typing)
                .await
                .map_err(RejectReason::from),
        };

        if let Err(reason) = result {
            self.reject(connection_id, reason).await;
        }
        result
    }

    /// 受信フレームをデコードできなかった
    pub async fn reject_malformed(&self, connection_id: &ConnectionId) {
        self.reject(connection_id, RejectReason::Malformed).await;
    }

    /// 接続が閉じた（正常・異常を問わない）
    pub async fn disconnect(&self, connection_id: &ConnectionId) {
        match self.disconnect_participant.execute(connection_id).await {
            Some(name) => tracing::info!("{} left the chat", name),
            None => tracing::debug!("Connection '{}' closed before joining", connection_id),
        }
    }

    async fn reject(&self, connection_id: &ConnectionId, reason: RejectReason) {
        tracing::debug!(
            "Dropped event from '{}': {}",
            connection_id,
            reason.as_str()
        );
        if !self.config.notify_rejections {
            return;
        }
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &ChatEvent::Rejected(reason))
            .await
        {
            tracing::warn!("Failed to notify '{}' of rejection: {}", connection_id, e);
        }
    }
}
