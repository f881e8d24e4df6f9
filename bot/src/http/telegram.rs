//! Telegram Bot API client

use async_trait::async_trait;
use secrecy::ExposeSecret;
use teloxide::prelude::*;
use tracing::{error, info};
use url::Url;

use crate::app::options::TelegramOptions;
use crate::errors::BridgeError;

/// Delivers reply text to a chat
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BridgeError>;
}

/// Telegram client backed by a teloxide [`Bot`]
pub struct TelegramClient {
    bot: Bot,
}

impl TelegramClient {
    /// Create a new Telegram client
    pub fn new(options: &TelegramOptions) -> Result<Self, BridgeError> {
        let api_url = Url::parse(&options.api_base_url).map_err(|e| {
            BridgeError::ConfigError(format!("invalid Telegram API URL: {e}"))
        })?;
        let bot = Bot::new(options.token.expose_secret()).set_api_url(api_url);

        Ok(Self { bot })
    }

    /// Resolve the bot's username via `getMe`
    pub async fn bot_username(&self) -> Result<String, BridgeError> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| api_error("getMe", e))?;

        info!("Telegram bot authenticated as @{}", me.username());
        Ok(me.username().to_string())
    }

    /// Ask Telegram to push future updates to `url`
    pub async fn set_webhook(&self, url: &str) -> Result<(), BridgeError> {
        info!("Registering Telegram webhook at {}", url);

        let url = Url::parse(url)
            .map_err(|e| BridgeError::ConfigError(format!("invalid webhook URL: {e}")))?;
        self.bot
            .set_webhook(url)
            .await
            .map_err(|e| api_error("setWebhook", e))?;
        Ok(())
    }
}

#[async_trait]
impl ChatSender for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), BridgeError> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .map_err(|e| api_error("sendMessage", e))?;
        Ok(())
    }
}

fn api_error(method: &str, e: teloxide::RequestError) -> BridgeError {
    error!("Telegram {} failed: {}", method, e);
    BridgeError::TelegramError(format!("{method}: {e}"))
}
