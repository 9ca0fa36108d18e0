//! Data Transfer Objects (DTOs) for the chat application.
//!
//! - `websocket`: WebSocket message DTOs
//! - `conversion`: mapping between DTOs and domain values

pub mod conversion;
pub mod websocket;
