//! Transport layer: axum routes, the WebSocket connection lifecycle and
//! graceful shutdown.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
