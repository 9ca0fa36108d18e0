//! Utilities shared by the Banter packages: logging setup and time handling.

pub mod logger;
pub mod time;
