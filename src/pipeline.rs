//! The run pipeline.
//!
//! One sequential pass: load watch configs → fetch the connection snapshot
//! → threshold check → match → alert per match → heartbeat. All side
//! effects live inside [`run`] so the core logic stays testable without
//! touching the network; `main.rs` only owns process-level concerns.

use std::collections::BTreeSet;
use std::time::Duration;

use chrono::Utc;

use crate::alerts::template::{format_message, CONNECTION_ALERT_TEMPLATE};
use crate::alerts::{AlertChannels, Channel};
use crate::config::Config;
use crate::error::AppError;
use crate::matcher::matched_connections;
use crate::services::eve_scout::EveScoutClient;
use crate::watchlist::{load_configs, watched_regions, watched_systems};

/// What one run did, for logging and tests.
#[derive(Debug)]
pub struct RunSummary {
    pub connection_count: usize,
    pub matched: usize,
    pub alerts_sent: usize,
}

/// Execute one monitoring run.
///
/// Structural and data-quality errors propagate to the caller (which maps
/// them to exit codes) after a human-readable message has gone to the
/// debug channel; delivery failures never propagate. The heartbeat is
/// always the logically last notification of a run that got far enough to
/// observe a connection count.
pub async fn run(config: &Config) -> Result<RunSummary, AppError> {
    let channels = AlertChannels::from_config(config)?;

    // 1. Watchlist. A bad document is skipped and reported; only an
    // unusable directory aborts the run.
    let loaded = match load_configs(&config.config_dir) {
        Ok(loaded) => loaded,
        Err(err) => {
            channels.notify(Channel::Debug, &err.to_string()).await;
            return Err(err);
        }
    };
    for failure in &loaded.failures {
        channels
            .notify(Channel::Debug, &failure.to_error().to_string())
            .await;
    }

    // 2. Snapshot.
    let client = EveScoutClient::new(
        config.eve_scout_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    )?;
    let snapshot = match client.fetch_connections().await {
        Ok(snapshot) => snapshot,
        Err(err) => {
            channels.notify(Channel::Debug, &err.to_string()).await;
            return Err(err);
        }
    };

    // 3. Data quality. A low count is indistinguishable from a broken
    // feed: report it on both operational channels and stop before any
    // matching happens.
    if let Err(err) = snapshot.check_threshold(config.min_connections) {
        channels.notify(Channel::Debug, &err.to_string()).await;
        channels
            .notify(
                Channel::Heartbeat,
                &format!("Current connections count: {}", snapshot.count()),
            )
            .await;
        return Err(err);
    }

    // 4. Match and alert.
    let matched = matched_connections(&snapshot, &loaded.configs);
    let mut alerts_sent = 0;
    for connection in &matched {
        let message = format_message(CONNECTION_ALERT_TEMPLATE, &connection.template_values());
        if channels.notify(Channel::Main, &message).await {
            alerts_sent += 1;
        }
    }

    // 5. Heartbeat, exactly once per completed run.
    let heartbeat = heartbeat_message(
        snapshot.count(),
        &watched_systems(&loaded.configs),
        &watched_regions(&loaded.configs),
    );
    channels.notify(Channel::Heartbeat, &heartbeat).await;

    let summary = RunSummary {
        connection_count: snapshot.count(),
        matched: matched.len(),
        alerts_sent,
    };
    tracing::info!(
        "Run complete: {} known connections, {} matched, {} alerts delivered",
        summary.connection_count,
        summary.matched,
        summary.alerts_sent
    );
    Ok(summary)
}

fn heartbeat_message(
    count: usize,
    systems: &BTreeSet<String>,
    regions: &BTreeSet<String>,
) -> String {
    format!(
        "Current known connections count with Thera: {}.\n\
         Looking for regions: [{}]\n\
         Looking for systems: [{}]\n\
         Run finished at {}",
        count,
        join(regions),
        join(systems),
        Utc::now().to_rfc3339()
    )
}

fn join(names: &BTreeSet<String>) -> String {
    names.iter().cloned().collect::<Vec<_>>().join(", ")
}
