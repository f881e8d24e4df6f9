//! Application configuration options

use std::time::Duration;

use secrecy::SecretString;

/// Main application options, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Telegram bot configuration
    pub telegram: TelegramOptions,

    /// Jenkins job configuration
    pub jenkins: JenkinsOptions,

    /// Webhook server configuration
    pub server: ServerOptions,

    /// Dashboard server configuration
    pub dashboard: ServerOptions,

    /// Enable the dashboard server
    pub enable_dashboard: bool,
}

/// Telegram bot options
#[derive(Debug, Clone)]
pub struct TelegramOptions {
    /// Bot API token
    pub token: SecretString,

    /// Bot API base URL
    pub api_base_url: String,

    /// Public URL Telegram pushes updates to
    pub webhook_url: String,
}

/// Jenkins job options
#[derive(Debug, Clone)]
pub struct JenkinsOptions {
    /// Jenkins server base URL
    pub base_url: String,

    /// User for basic auth
    pub user: String,

    /// API token for basic auth
    pub token: SecretString,

    /// Name of the job to trigger and poll
    pub job: String,
}

/// Lifecycle options
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// HTTP listener options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl ServerOptions {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
        }
    }
}
