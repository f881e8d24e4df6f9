//! Outbound HTTP clients

pub mod jenkins;
pub mod telegram;

pub use jenkins::{BuildServer, JenkinsClient};
pub use telegram::{ChatSender, TelegramClient};
