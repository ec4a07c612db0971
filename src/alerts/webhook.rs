//! Discord-compatible webhook delivery.
//!
//! Each notifier owns one webhook URL and POSTs messages as
//! `{"content": "..."}` JSON, which is the payload shape Discord webhook
//! endpoints accept.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{Notifier, NotifyError};

pub struct WebhookNotifier {
    url: String,
    http: Client,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            url,
            http: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&json!({ "content": message }))
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Status(response.status().as_u16()));
        }

        Ok(())
    }
}
