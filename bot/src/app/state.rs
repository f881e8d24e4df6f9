//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::commands::Dispatcher;
use crate::errors::BridgeError;
use crate::http::{JenkinsClient, TelegramClient};

/// Main application state
///
/// Everything here is immutable once built; listeners share it through `Arc`.
pub struct AppState {
    /// Jenkins client for the configured job
    pub jenkins: Arc<JenkinsClient>,

    /// Telegram Bot API client
    pub telegram: Arc<TelegramClient>,

    /// Command dispatcher wired to both clients
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Initialize application state.
    ///
    /// Resolves the bot's username with `getMe`; commands addressed to other
    /// bots are told apart by it, so failing to resolve it is fatal.
    pub async fn init(options: &AppOptions) -> Result<Self, BridgeError> {
        info!("Initializing application state...");

        let jenkins = Arc::new(JenkinsClient::new(&options.jenkins)?);
        let telegram = Arc::new(TelegramClient::new(&options.telegram)?);
        let bot_username = telegram.bot_username().await?;
        let dispatcher = Arc::new(Dispatcher::new(
            jenkins.clone(),
            telegram.clone(),
            bot_username,
        ));

        Ok(Self {
            jenkins,
            telegram,
            dispatcher,
        })
    }
}
