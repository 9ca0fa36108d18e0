//! Real-time broadcast chat server.
//!
//! Every connected participant shares one room: chat messages reach all
//! joined participants, newcomers receive the recent history, and presence,
//! participant counts and typing indicators are kept in sync.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
