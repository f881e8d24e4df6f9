//! CI bridge library
//!
//! Relays Telegram bot commands to a Jenkins job and reports the results
//! back to the chat.

pub mod app;
pub mod commands;
pub mod dashboard;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod server;
pub mod utils;
