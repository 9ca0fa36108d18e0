//! Runtime configuration.

use std::path::PathBuf;

use crate::{domain::DEFAULT_HISTORY_CAPACITY, usecase::RouterConfig};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "public";
/// Events buffered per connection before it counts as a slow consumer.
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Everything the server binary needs to wire and run the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: PathBuf,
    pub history_capacity: usize,
    pub outbound_buffer: usize,
    pub notify_rejections: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
            notify_rejections: false,
        }
    }
}

impl ServerConfig {
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            notify_rejections: self.notify_rejections,
        }
    }

    /// Zero capacities are raised to one.
    pub fn normalized(mut self) -> Self {
        self.history_capacity = self.history_capacity.max(1);
        self.outbound_buffer = self.outbound_buffer.max(1);
        self
    }
}
