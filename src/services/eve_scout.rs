//! EVE-Scout upstream client.
//!
//! Fetches the current set of Thera wormhole connections. The feed is a
//! public, occasionally rate-limited API, so transient failures are retried
//! with a short linear backoff before the run gives up. The data-quality
//! threshold check is a separate pure step on the snapshot — observing and
//! notifying on a low count is the orchestrator's job, not the client's.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tokio::time::sleep;

use crate::error::AppError;

/// Attempts made against the upstream feed before giving up.
const FETCH_ATTEMPTS: u32 = 5;

/// One wormhole link record from the feed. Read-only; extra upstream
/// fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(default)]
    pub signature_id: Option<String>,
    #[serde(default)]
    pub wormhole_destination_signature_id: Option<String>,
    pub source_solar_system: SolarSystem,
    pub destination_solar_system: SolarSystem,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SolarSystem {
    pub name: String,
    pub region: Region,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Region {
    pub name: String,
}

impl Connection {
    /// Stable identity for de-duplicating match results: the signature
    /// pair when the feed provides it, the endpoint-name pair otherwise.
    pub fn dedup_key(&self) -> (String, String) {
        match (&self.signature_id, &self.wormhole_destination_signature_id) {
            (Some(src), Some(dst)) => (src.clone(), dst.clone()),
            _ => (
                self.source_solar_system.name.clone(),
                self.destination_solar_system.name.clone(),
            ),
        }
    }

    /// Placeholder values for the alert message template.
    pub fn template_values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        values.insert(
            "signatureId".to_string(),
            self.signature_id.clone().unwrap_or_else(|| "?".to_string()),
        );
        values.insert(
            "wormholeDestinationSignatureId".to_string(),
            self.wormhole_destination_signature_id
                .clone()
                .unwrap_or_else(|| "?".to_string()),
        );
        values.insert(
            "sourceSolarSystem".to_string(),
            describe_endpoint(&self.source_solar_system),
        );
        values.insert(
            "destinationSolarSystem".to_string(),
            describe_endpoint(&self.destination_solar_system),
        );
        values
    }
}

fn describe_endpoint(system: &SolarSystem) -> String {
    format!("{} ({})", system.name, system.region.name)
}

/// The full set of connections fetched in one run.
#[derive(Debug)]
pub struct ConnectionSnapshot {
    pub connections: Vec<Connection>,
}

impl ConnectionSnapshot {
    pub fn count(&self) -> usize {
        self.connections.len()
    }

    /// Pure data-quality check: a count below `threshold` is
    /// indistinguishable from a broken feed, so matching on it is refused.
    pub fn check_threshold(&self, threshold: usize) -> Result<(), AppError> {
        let count = self.count();
        if count < threshold {
            return Err(AppError::InsufficientData { count, threshold });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct EveScoutClient {
    url: String,
    http: Client,
}

impl EveScoutClient {
    pub fn new(url: String, request_timeout: Duration) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| AppError::network(err.to_string()))?;
        Ok(Self { url, http })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current connection set.
    ///
    /// Transient failures (send error, timeout, non-2xx status) are retried
    /// up to five attempts with linear backoff (0s, 1s, 2s, 3s, 4s). A feed
    /// that stays unreachable is classified as insufficient data — no
    /// meaningful filtering is possible either way. A body that is not a
    /// JSON connection array is fatal for the run.
    pub async fn fetch_connections(&self) -> Result<ConnectionSnapshot, AppError> {
        let response = self.get_with_retry().await?;

        let connections = response
            .json::<Vec<Connection>>()
            .await
            .map_err(|err| AppError::parse(err.to_string()))?;

        tracing::info!("Fetched {} known connections", connections.len());
        Ok(ConnectionSnapshot { connections })
    }

    async fn get_with_retry(&self) -> Result<reqwest::Response, AppError> {
        let mut last_failure = String::new();

        for attempt in 0..FETCH_ATTEMPTS {
            if attempt > 0 {
                sleep(Duration::from_secs(attempt as u64)).await;
            }

            match self.http.get(&self.url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(response);
                }
                Ok(response) => {
                    last_failure = format!("upstream returned HTTP {}", response.status());
                }
                Err(err) => {
                    last_failure = err.to_string();
                }
            }

            tracing::warn!(
                "Fetch attempt {}/{} against {} failed: {}",
                attempt + 1,
                FETCH_ATTEMPTS,
                self.url,
                last_failure
            );
        }

        tracing::error!("Unable to connect to {}: {}", self.url, last_failure);
        Err(AppError::Unreachable {
            url: self.url.clone(),
            message: last_failure,
        })
    }
}
