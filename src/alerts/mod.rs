//! Outbound notification delivery.
//!
//! Three named channels (main alerts, heartbeat, debug/operational) sit in
//! front of a pluggable delivery backend. Delivery is best-effort at this
//! boundary: a webhook being down must never abort the monitoring run, so
//! failures are logged and swallowed here and nowhere else.

pub mod telegram;
pub mod template;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, NotifyBackend};
use crate::error::AppError;
use telegram::TelegramNotifier;
use webhook::WebhookNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {0}")]
    Status(u16),
}

/// A single outbound delivery target.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<(), NotifyError>;
}

/// The named channel a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Main,
    Heartbeat,
    Debug,
}

impl Channel {
    fn label(self) -> &'static str {
        match self {
            Channel::Main => "main",
            Channel::Heartbeat => "heartbeat",
            Channel::Debug => "debug",
        }
    }
}

/// The full channel set used by one run.
pub struct AlertChannels {
    main: Arc<dyn Notifier>,
    heartbeat: Arc<dyn Notifier>,
    debug: Arc<dyn Notifier>,
}

impl AlertChannels {
    /// Build the channel set for the configured backend.
    ///
    /// The Telegram backend delivers every channel into the one configured
    /// chat; it is an optional secondary path, never the default.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        match config.notify_backend {
            NotifyBackend::Webhook => Ok(Self {
                main: Arc::new(WebhookNotifier::new(
                    config.channels.main_webhook_url.clone(),
                )),
                heartbeat: Arc::new(WebhookNotifier::new(
                    config.channels.heartbeat_webhook_url.clone(),
                )),
                debug: Arc::new(WebhookNotifier::new(
                    config.channels.debug_webhook_url.clone(),
                )),
            }),
            NotifyBackend::Telegram => {
                let telegram = config.telegram.as_ref().ok_or_else(|| {
                    AppError::config("telegram backend selected without credentials")
                })?;
                let shared: Arc<dyn Notifier> = Arc::new(TelegramNotifier::new(
                    telegram.bot_token.clone(),
                    telegram.chat_id.clone(),
                ));
                Ok(Self {
                    main: shared.clone(),
                    heartbeat: shared.clone(),
                    debug: shared,
                })
            }
        }
    }

    pub fn new(
        main: Arc<dyn Notifier>,
        heartbeat: Arc<dyn Notifier>,
        debug: Arc<dyn Notifier>,
    ) -> Self {
        Self { main, heartbeat, debug }
    }

    /// Deliver `message` to `channel`, best-effort.
    ///
    /// Returns whether delivery succeeded; the failure itself never
    /// propagates past this point.
    pub async fn notify(&self, channel: Channel, message: &str) -> bool {
        let target = match channel {
            Channel::Main => &self.main,
            Channel::Heartbeat => &self.heartbeat,
            Channel::Debug => &self.debug,
        };

        match target.send(message).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    "Delivery to {} channel failed: {}",
                    channel.label(),
                    err
                );
                false
            }
        }
    }
}
