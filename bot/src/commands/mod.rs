//! Chat command dispatch
//!
//! Maps the bot's commands onto Jenkins calls and turns every outcome,
//! including failures, into exactly one reply for the chat.

use std::sync::Arc;

use teloxide::types::{Update, UpdateKind};
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use crate::errors::BridgeError;
use crate::http::{BuildServer, ChatSender};

pub const HELP_TEXT: &str = "Welcome to the Jenkins build bot!\n\
Available commands:\n\
/build - trigger a Jenkins build\n\
/status - show the latest build status";

/// Commands understood by the bot
#[derive(BotCommands, Debug, Clone, Copy, PartialEq, Eq)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "show the welcome text")]
    Start,
    #[command(description = "show the welcome text")]
    Help,
    #[command(description = "trigger a Jenkins build")]
    Build,
    #[command(description = "show the latest build status")]
    Status,
}

impl Command {
    /// Parse the command a message starts with.
    ///
    /// The command must open the message. Names match ignoring case and a
    /// `@suffix` is only accepted when it names this bot. Trailing
    /// arguments are ignored.
    pub fn from_text(text: &str, bot_username: &str) -> Option<Self> {
        if !text.starts_with('/') {
            return None;
        }
        let token = text.split_whitespace().next()?;
        let (name, suffix) = match token.split_once('@') {
            Some((name, suffix)) => (name, Some(suffix)),
            None => (token, None),
        };
        if let Some(suffix) = suffix {
            if !suffix.eq_ignore_ascii_case(bot_username) {
                return None;
            }
        }

        <Self as BotCommands>::parse(&name.to_lowercase(), bot_username).ok()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Build => "build",
            Command::Status => "status",
        }
    }
}

/// Routes commands to their handlers and sends the replies
pub struct Dispatcher {
    build_server: Arc<dyn BuildServer>,
    chat: Arc<dyn ChatSender>,
    bot_username: String,
}

impl Dispatcher {
    pub fn new(
        build_server: Arc<dyn BuildServer>,
        chat: Arc<dyn ChatSender>,
        bot_username: impl Into<String>,
    ) -> Self {
        Self {
            build_server,
            chat,
            bot_username: bot_username.into(),
        }
    }

    /// Handle one inbound update.
    ///
    /// New and edited messages are both acted on. Returns the command that
    /// was executed, or `None` when the update carried nothing to act on.
    pub async fn process_update(&self, update: &Update) -> Result<Option<Command>, BridgeError> {
        let update_id = update.id.0;
        let message = match &update.kind {
            UpdateKind::Message(message) | UpdateKind::EditedMessage(message) => message,
            _ => {
                debug!("Update {} carries no message, ignoring", update_id);
                return Ok(None);
            }
        };
        let Some(text) = message.text() else {
            debug!("Update {} carries no text, ignoring", update_id);
            return Ok(None);
        };
        let Some(command) = Command::from_text(text, &self.bot_username) else {
            debug!("Update {} is not a known command: {:?}", update_id, text);
            return Ok(None);
        };

        let chat_id = message.chat.id.0;
        info!("Handling /{} for chat {}", command.name(), chat_id);

        let reply = self.execute(command).await;
        self.chat.send_message(chat_id, &reply).await?;
        Ok(Some(command))
    }

    /// Run a command and produce its reply
    pub async fn execute(&self, command: Command) -> String {
        match command {
            Command::Start | Command::Help => self.help(),
            Command::Build => self.build().await,
            Command::Status => self.status().await,
        }
    }

    pub fn help(&self) -> String {
        HELP_TEXT.to_string()
    }

    pub async fn build(&self) -> String {
        self.build_server
            .trigger_build()
            .await
            .failure_message()
            .unwrap_or_else(|| "Build triggered! Check on it later with /status.".to_string())
    }

    pub async fn status(&self) -> String {
        match self.build_server.fetch_latest_status().await {
            Ok(status) => format!(
                "Latest build #{}\nResult: {}\nTime: {}",
                status.number_display(),
                status.result_display(),
                status.timestamp_display(),
            ),
            Err(e) => {
                warn!("Status fetch failed: {}", e);
                format!("Failed to fetch build status: {}", e)
            }
        }
    }
}
