//! Real-time broadcast chat server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin banter-server
//! cargo run --bin banter-server -- --host 0.0.0.0 --port 3000
//! PORT=8080 cargo run --bin banter-server
//! ```

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use banter_server::{
    config::{
        DEFAULT_HOST, DEFAULT_OUTBOUND_BUFFER, DEFAULT_PORT, DEFAULT_STATIC_DIR, ServerConfig,
    },
    domain::{ChatRoom, DEFAULT_HISTORY_CAPACITY},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryChatRepository},
    ui::Server,
    usecase::BroadcastRouter,
};
use banter_shared::{logger::setup_logger, time::SystemClock};
use clap::Parser;
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "banter-server")]
#[command(about = "Real-time broadcast chat server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "BANTER_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Directory served for every path other than /ws and /api/health
    #[arg(long, env = "BANTER_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,

    /// Number of chat messages kept for newcomers
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Events buffered per connection before it is dropped as a slow consumer
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_BUFFER)]
    outbound_buffer: usize,

    /// Tell the sender why an event was dropped
    #[arg(long)]
    notify_rejections: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            host: args.host,
            port: args.port,
            static_dir: args.static_dir,
            history_capacity: args.history_capacity,
            outbound_buffer: args.outbound_buffer,
            notify_rejections: args.notify_rejections,
        }
        .normalized()
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let config = ServerConfig::from(Args::parse());

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. BroadcastRouter
    // 4. Server

    // 1. Create Repository (in-memory room)
    let room = Arc::new(Mutex::new(ChatRoom::with_history_capacity(
        config.history_capacity,
    )));
    let repository = Arc::new(InMemoryChatRepository::new(room));

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
        HashMap::new(),
    ))));

    // 3. Create the router and its use cases
    let router = Arc::new(BroadcastRouter::new(
        repository,
        message_pusher,
        Arc::new(SystemClock),
        config.router_config(),
    ));

    // 4. Create and run the server
    let server = Server::new(router, config.static_dir.clone(), config.outbound_buffer);
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
