//! AdGuard Home DNS filter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::percentage;
use crate::core::transport::{best_effort, new_client, HttpClient};
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(10);

pub struct AdGuardProvider;

#[derive(Debug, Clone)]
struct AdGuardSettings {
    server_url: String,
    username: String,
    password: String,
}

impl AdGuardSettings {
    fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            server_url: config.server_url("serverUrl")?,
            username: config.require_str("username")?.to_string(),
            password: config.require_str("password")?.to_string(),
        })
    }
}

/// Raw counters as reported by `/control/stats` plus the derived fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdGuardStats {
    #[serde(default)]
    pub num_dns_queries: u64,
    #[serde(default)]
    pub num_blocked_filtering: u64,
    #[serde(default)]
    pub avg_processing_time: f64,
    #[serde(default)]
    pub time_units: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub health: String,
    #[serde(default, rename = "totalQueries")]
    pub total_queries: u64,
    #[serde(default, rename = "blockedQueries")]
    pub blocked_queries: u64,
    #[serde(default, rename = "blockingPercentage")]
    pub blocking_percentage: f64,
    #[serde(default, rename = "timeUnit")]
    pub time_unit: String,
}

impl AdGuardStats {
    /// Fill in the camelCase fields from the raw counters
    fn derive(&mut self) {
        self.total_queries = self.num_dns_queries;
        self.blocked_queries = self.num_blocked_filtering;
        self.time_unit = self.time_units.clone();
        self.blocking_percentage =
            percentage(self.blocked_queries as f64, self.total_queries as f64);
    }
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    #[serde(default)]
    announcement: String,
}

impl AdGuardProvider {
    fn get<T: serde::de::DeserializeOwned>(
        client: &HttpClient,
        settings: &AdGuardSettings,
        endpoint: &str,
    ) -> Result<T> {
        let url = format!("{}{}", settings.server_url, endpoint);
        client.get_json(
            client
                .get(&url)
                .basic_auth(&settings.username, Some(&settings.password))
                .header("Content-Type", "application/json"),
        )
    }

    fn fetch(settings: &AdGuardSettings) -> Result<AdGuardStats> {
        let client = new_client(TIMEOUT, false)?;

        let mut stats: AdGuardStats = Self::get(&client, settings, "/control/stats")
            .map_err(|e| e.during("failed to fetch stats"))?;
        stats.derive();

        let version = best_effort(
            "AdGuard version check",
            Self::get::<VersionInfo>(&client, settings, "/control/version.json"),
        );
        if let Some(version) = version {
            stats.health = version.announcement;
        }

        Ok(stats)
    }
}

impl Provider for AdGuardProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::AdGuardHome
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        AdGuardSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = AdGuardSettings::from_config(config)?;
        Self::fetch(&settings).map(CanonicalStats::AdGuard)
    }
}
