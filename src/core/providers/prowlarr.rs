//! Prowlarr indexer aggregator.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::{percentage, Alert};
use crate::core::transport::{best_effort, new_client, HttpClient};
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(15);

/// Failure rate (percent of queries) above which an alert is raised
const FAILURE_RATE_THRESHOLD: f64 = 20.0;

pub struct ProwlarrProvider;

#[derive(Debug, Clone)]
struct ProwlarrSettings {
    server_url: String,
    api_key: String,
}

impl ProwlarrSettings {
    fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            server_url: config.server_url("serverUrl")?,
            api_key: config.require_str("apiKey")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProwlarrStats {
    pub total_queries: u64,
    pub total_grabs: u64,
    pub total_failed_queries: u64,
    pub active_indexers: u64,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Default, Deserialize)]
struct IndexerStatsResponse {
    #[serde(default)]
    indexers: Vec<IndexerStats>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexerStats {
    #[serde(default)]
    number_of_queries: u64,
    #[serde(default)]
    number_of_grabs: u64,
    #[serde(default)]
    number_of_failed_queries: u64,
}

#[derive(Debug, Deserialize)]
struct HealthMessage {
    #[serde(default)]
    message: String,
}

impl ProwlarrStats {
    fn from_parts(indexers: &[IndexerStats], health: &[HealthMessage]) -> Self {
        let mut stats = ProwlarrStats {
            active_indexers: indexers.len() as u64,
            ..Default::default()
        };
        for indexer in indexers {
            stats.total_queries += indexer.number_of_queries;
            stats.total_grabs += indexer.number_of_grabs;
            stats.total_failed_queries += indexer.number_of_failed_queries;
        }

        stats.alerts = health
            .iter()
            .map(|h| Alert::warning(h.message.clone()))
            .collect();

        if stats.total_queries > 0 {
            let failure_rate =
                percentage(stats.total_failed_queries as f64, stats.total_queries as f64);
            if failure_rate > FAILURE_RATE_THRESHOLD {
                stats.alerts.push(Alert::warning(format!(
                    "High failure rate: {:.1}% of queries are failing",
                    failure_rate
                )));
            }
        }

        if stats.active_indexers == 0 {
            stats.alerts.push(Alert::error("No active indexers found"));
        }

        stats
    }
}

impl ProwlarrProvider {
    fn get<T: DeserializeOwned>(
        client: &HttpClient,
        settings: &ProwlarrSettings,
        endpoint: &str,
    ) -> Result<T> {
        let url = format!("{}/api/v1/{}", settings.server_url, endpoint);
        client.get_json(
            client
                .get(&url)
                .header("X-Api-Key", &settings.api_key)
                .header("Accept", "application/json"),
        )
    }
}

impl Provider for ProwlarrProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Prowlarr
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        ProwlarrSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = ProwlarrSettings::from_config(config)?;
        let client = new_client(TIMEOUT, true)?;

        let indexer_stats: IndexerStatsResponse = Self::get(&client, &settings, "indexerstats")
            .map_err(|e| e.during("failed to fetch indexer stats"))?;
        let health: Vec<HealthMessage> =
            best_effort("Prowlarr health", Self::get(&client, &settings, "health"))
                .unwrap_or_default();

        Ok(CanonicalStats::Prowlarr(ProwlarrStats::from_parts(
            &indexer_stats.indexers,
            &health,
        )))
    }
}
