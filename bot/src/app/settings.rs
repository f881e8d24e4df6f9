//! Settings loaded from the environment

use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

use crate::app::options::{
    AppOptions, JenkinsOptions, LifecycleOptions, ServerOptions, TelegramOptions,
};
use crate::errors::BridgeError;
use crate::logs::{LogLevel, LogOptions};

pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8501;
pub const DEFAULT_DASHBOARD_PORT: u16 = 8502;

/// Bridge settings, read once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    /// Log level
    pub log_level: LogLevel,

    /// Emit JSON log lines
    pub log_json: bool,

    /// Directory for rolling log files
    pub log_dir: Option<PathBuf>,

    /// Telegram bot token
    pub telegram_token: SecretString,

    /// Telegram Bot API base URL
    pub telegram_api_url: String,

    /// Jenkins server base URL
    pub jenkins_url: String,

    /// Jenkins user
    pub jenkins_user: String,

    /// Jenkins API token
    pub jenkins_token: SecretString,

    /// Jenkins job name
    pub jenkins_job: String,

    /// Public webhook URL registered with Telegram
    pub webhook_url: String,

    /// Host the listeners bind to
    pub host: String,

    /// Webhook listener port
    pub port: u16,

    /// Dashboard listener port
    pub dashboard_port: u16,

    /// Serve the dashboard next to the webhook listener
    pub enable_dashboard: bool,
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, BridgeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| BridgeError::ConfigError(format!("{key} is not set")))
        };

        let log_level = match get("LOG_LEVEL") {
            Some(level) => level.parse().map_err(BridgeError::ConfigError)?,
            None => LogLevel::default(),
        };
        let log_json = match get("LOG_JSON") {
            Some(value) => parse_bool("LOG_JSON", &value)?,
            None => false,
        };
        let enable_dashboard = match get("ENABLE_DASHBOARD") {
            Some(value) => parse_bool("ENABLE_DASHBOARD", &value)?,
            None => true,
        };

        let settings = Self {
            log_level,
            log_json,
            log_dir: get("LOG_DIR").map(PathBuf::from),
            telegram_token: SecretString::from(required("TELEGRAM_TOKEN")?),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            jenkins_url: required("JENKINS_URL")?,
            jenkins_user: required("JENKINS_USER")?,
            jenkins_token: SecretString::from(required("JENKINS_TOKEN")?),
            jenkins_job: required("JENKINS_JOB")?,
            webhook_url: required("WEBHOOK_URL")?,
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_port("PORT", get("PORT"), DEFAULT_PORT)?,
            dashboard_port: parse_port(
                "DASHBOARD_PORT",
                get("DASHBOARD_PORT"),
                DEFAULT_DASHBOARD_PORT,
            )?,
            enable_dashboard,
        };

        validate_http_url("TELEGRAM_API_URL", &settings.telegram_api_url)?;
        validate_http_url("JENKINS_URL", &settings.jenkins_url)?;
        validate_http_url("WEBHOOK_URL", &settings.webhook_url)?;

        Ok(settings)
    }

    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            lifecycle: LifecycleOptions::default(),
            telegram: TelegramOptions {
                token: self.telegram_token.clone(),
                api_base_url: self.telegram_api_url.clone(),
                webhook_url: self.webhook_url.clone(),
            },
            jenkins: JenkinsOptions {
                base_url: self.jenkins_url.clone(),
                user: self.jenkins_user.clone(),
                token: self.jenkins_token.clone(),
                job: self.jenkins_job.clone(),
            },
            server: ServerOptions {
                host: self.host.clone(),
                port: self.port,
            },
            dashboard: ServerOptions {
                host: self.host.clone(),
                port: self.dashboard_port,
            },
            enable_dashboard: self.enable_dashboard,
        }
    }

    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level.clone(),
            json_format: self.log_json,
            log_dir: self.log_dir.clone(),
            ..Default::default()
        }
    }
}

fn parse_port(key: &str, value: Option<String>, default: u16) -> Result<u16, BridgeError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| BridgeError::ConfigError(format!("{key} is not a valid port: {value}"))),
        None => Ok(default),
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, BridgeError> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(BridgeError::ConfigError(format!("{key} is not a boolean: {value}"))),
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), BridgeError> {
    let url = Url::parse(value)
        .map_err(|e| BridgeError::ConfigError(format!("{key} is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BridgeError::ConfigError(format!(
            "{key} must be an http(s) URL, got scheme {scheme}"
        ))),
    }
}
