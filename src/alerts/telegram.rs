//! Telegram bot delivery backend.
//!
//! Optional secondary path behind the same [`Notifier`] trait as the
//! webhook backend; selected with `NOTIFY_BACKEND=telegram` plus bot
//! credentials and never wired into the default pipeline.

use async_trait::async_trait;
use reqwest::Client;

use super::{Notifier, NotifyError};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

pub struct TelegramNotifier {
    api_base: String,
    bot_token: String,
    chat_id: String,
    http: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self::with_api_base(TELEGRAM_API_BASE.to_string(), bot_token, chat_id)
    }

    /// Point the notifier at a different API host. Used by tests.
    pub fn with_api_base(api_base: String, bot_token: String, chat_id: String) -> Self {
        Self {
            api_base,
            bot_token,
            chat_id,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.bot_token);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("chat_id", self.chat_id.as_str()),
                ("parse_mode", "Markdown"),
                ("text", message),
            ])
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
