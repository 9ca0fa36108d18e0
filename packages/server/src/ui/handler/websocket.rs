//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ConnectionId, PusherChannel},
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::BroadcastRouter,
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that drains this connection's outbound channel into the socket.
///
/// The task ends when the channel is closed or the socket refuses a write.
/// A write to a peer that stopped reading never returns; eviction covers that.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    })
}

/// Spawns a task that decodes inbound frames and hands them to the router.
fn reader_loop(
    mut receiver: SplitStream<WebSocket>,
    router: Arc<BroadcastRouter>,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_message) => {
                        // 拒否理由はルーター側でログ出力・通知済み
                        let _ = router.handle(&connection_id, client_message.into()).await;
                    }
                    Err(e) => {
                        tracing::debug!(
                            "Malformed frame from '{}': {}",
                            connection_id,
                            e
                        );
                        router.reject_malformed(&connection_id).await;
                    }
                },
                Message::Binary(_) => {
                    router.reject_malformed(&connection_id).await;
                }
                Message::Close(_) => {
                    tracing::debug!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = ConnectionId::generate();
    let (tx, rx) = mpsc::channel(state.outbound_buffer.max(1));
    let evicted = CancellationToken::new();

    state
        .router
        .connect(connection_id.clone(), PusherChannel::new(tx, evicted.clone()))
        .await;

    let (sender, receiver) = socket.split();
    let mut send_task = pusher_loop(rx, sender);
    let mut recv_task = reader_loop(receiver, state.router.clone(), connection_id.clone());

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
        _ = evicted.cancelled() => {
            tracing::warn!("Connection '{}' dropped as a slow consumer", connection_id);
            send_task.abort();
            recv_task.abort();
        }
    };

    state.router.disconnect(&connection_id).await;
}
