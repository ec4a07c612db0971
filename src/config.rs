use std::env;
use std::path::PathBuf;

use crate::cli::Cli;

/// Default upstream feed: EVE-Scout wormhole connections near Jita.
pub const DEFAULT_EVE_SCOUT_URL: &str =
    "https://www.eve-scout.com/api/wormholes?systemSearch=Jita";

/// Default directory of watchlist documents, relative to the process cwd.
pub const DEFAULT_CONFIG_DIR: &str = "conf";

/// Default minimum known-connection count before the feed is trusted.
pub const DEFAULT_MIN_CONNECTIONS: usize = 5;

/// Default per-request timeout in seconds for the upstream fetch.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 2;

#[derive(Debug, Clone)]
pub struct Config {
    pub eve_scout_url: String,
    pub config_dir: PathBuf,
    pub min_connections: usize,
    pub request_timeout_secs: u64,
    pub notify_backend: NotifyBackend,
    pub channels: ChannelConfig,
    pub telegram: Option<TelegramConfig>,
}

/// The three named outbound webhook endpoints.
#[derive(Debug, Clone)]
pub struct ChannelConfig {
    pub main_webhook_url: String,
    pub heartbeat_webhook_url: String,
    pub debug_webhook_url: String,
}

/// Credentials for the optional Telegram delivery backend.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyBackend {
    Webhook,
    Telegram,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let eve_scout_url = env::var("EVE_SCOUT_URL")
            .unwrap_or_else(|_| DEFAULT_EVE_SCOUT_URL.to_string());

        let config_dir = env::var("WATCH_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));

        let min_connections = match env::var("MIN_CONNECTIONS") {
            Ok(raw) => raw
                .parse::<usize>()
                .map_err(|_| "MIN_CONNECTIONS must be a valid number")?,
            Err(_) => DEFAULT_MIN_CONNECTIONS,
        };

        let request_timeout_secs = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .map_err(|_| "REQUEST_TIMEOUT_SECS must be a valid number")?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let notify_backend = match env::var("NOTIFY_BACKEND") {
            Ok(raw) => match raw.as_str() {
                "webhook" => NotifyBackend::Webhook,
                "telegram" => NotifyBackend::Telegram,
                other => return Err(format!("Invalid NOTIFY_BACKEND: {}", other)),
            },
            Err(_) => NotifyBackend::Webhook,
        };

        let channels = ChannelConfig {
            main_webhook_url: env::var("MAIN_WEBHOOK_URL")
                .map_err(|_| "MAIN_WEBHOOK_URL is required")?,
            heartbeat_webhook_url: env::var("HEARTBEAT_WEBHOOK_URL")
                .map_err(|_| "HEARTBEAT_WEBHOOK_URL is required")?,
            debug_webhook_url: env::var("DEBUG_WEBHOOK_URL")
                .map_err(|_| "DEBUG_WEBHOOK_URL is required")?,
        };

        // Telegram credentials are only required when that backend is selected.
        let telegram = match (env::var("TELEGRAM_BOT_TOKEN"), env::var("TELEGRAM_CHAT_ID")) {
            (Ok(bot_token), Ok(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        if notify_backend == NotifyBackend::Telegram && telegram.is_none() {
            return Err(
                "NOTIFY_BACKEND=telegram requires TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID"
                    .to_string(),
            );
        }

        Ok(Self {
            eve_scout_url,
            config_dir,
            min_connections,
            request_timeout_secs,
            notify_backend,
            channels,
            telegram,
        })
    }

    /// Apply command-line overrides on top of the environment config.
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if let Some(url) = &cli.eve_scout_url {
            self.eve_scout_url = url.clone();
        }
        if let Some(dir) = &cli.config_dir {
            self.config_dir = dir.clone();
        }
        if let Some(min) = cli.min_connections {
            self.min_connections = min;
        }
        self
    }
}
