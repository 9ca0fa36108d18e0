//! Server execution logic.

use std::{future::Future, path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::usecase::BroadcastRouter;

use super::{
    handler::{health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(router, "public".into(), 256);
/// server.run("127.0.0.1".to_string(), 3000).await?;
/// ```
pub struct Server {
    /// BroadcastRouter（ユースケースの束）
    router: Arc<BroadcastRouter>,
    /// 静的ファイルのルートディレクトリ
    static_dir: PathBuf,
    /// 接続ごとの送信バッファ容量
    outbound_buffer: usize,
}

impl Server {
    pub fn new(router: Arc<BroadcastRouter>, static_dir: PathBuf, outbound_buffer: usize) -> Self {
        Self {
            router,
            static_dir,
            outbound_buffer,
        }
    }

    /// Build the axum application.
    ///
    /// Anything not matched by `/ws` or `/api/health` is served from the
    /// static directory.
    pub fn app(&self) -> Router {
        let app_state = Arc::new(AppState {
            router: self.router.clone(),
            outbound_buffer: self.outbound_buffer,
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .fallback_service(ServeDir::new(&self.static_dir))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat server until Ctrl+C or SIGTERM.
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3000)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Serving static files from {}", self.static_dir.display());
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.app();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
