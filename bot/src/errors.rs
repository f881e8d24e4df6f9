//! Error types for the CI bridge

use thiserror::Error;

/// Main error type for the CI bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Reasons the latest build status could not be fetched from Jenkins
#[derive(Error, Debug)]
pub enum FetchError {
    /// No HTTP response was received
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Jenkins answered with a non-2xx status
    #[error("{status} - {body}")]
    Status { status: u16, body: String },

    /// The response body was not the JSON object we expected
    #[error("invalid JSON response: {0}")]
    Parse(#[from] serde_json::Error),
}
