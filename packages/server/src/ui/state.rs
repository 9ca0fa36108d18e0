//! Server state shared by every handler.

use std::sync::Arc;

use crate::usecase::BroadcastRouter;

/// Shared application state
pub struct AppState {
    /// BroadcastRouter（全イベントの入口）
    pub router: Arc<BroadcastRouter>,
    /// 接続ごとの送信バッファ容量（イベント数）
    pub outbound_buffer: usize,
}
