//! Sonarr series manager.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::arr::{ArrApi, ArrSettings, HealthCheck, SecondaryStats};
use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::DiskNeedle;
use crate::core::transport::new_client;
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(15);

const TV_DISK: DiskNeedle<'static> = DiskNeedle {
    path: "/tv",
    label: "tv",
    fallback_index: 3,
};

pub struct SonarrProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SonarrStats {
    pub total_series: u64,
    pub total_episodes: u64,
    pub missing_episodes: u64,
    pub queued_items: u64,
    pub download_progress: f64,
    pub total_storage: u64,
    pub free_storage: u64,
    pub version: String,
    pub health_alerts: Vec<HealthCheck>,
}

#[derive(Debug, Default, Deserialize)]
struct Series {
    #[serde(default)]
    statistics: SeriesStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeriesStatistics {
    #[serde(default)]
    episode_file_count: u64,
    #[serde(default)]
    total_episode_count: u64,
}

impl SonarrStats {
    fn from_parts(series: &[Series], version: String, secondary: SecondaryStats) -> Self {
        let total_episodes = series.iter().map(|s| s.statistics.total_episode_count).sum();
        let missing_episodes = series
            .iter()
            .map(|s| {
                s.statistics
                    .total_episode_count
                    .saturating_sub(s.statistics.episode_file_count)
            })
            .sum();

        SonarrStats {
            total_series: series.len() as u64,
            total_episodes,
            missing_episodes,
            queued_items: secondary.queued_items,
            download_progress: secondary.download_progress,
            total_storage: secondary.total_storage,
            free_storage: secondary.free_storage,
            version,
            health_alerts: secondary.health_alerts,
        }
    }
}

impl Provider for SonarrProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Sonarr
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        ArrSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = ArrSettings::from_config(config)?;
        let client = new_client(TIMEOUT, true)?;
        let api = ArrApi::new(&client, &settings, "/api/v3");

        let version = api.version_best_effort();
        let series: Vec<Series> = api
            .get("series")
            .map_err(|e| e.during("failed to fetch series data"))?;
        let secondary = api.secondary("queue", &settings.needle(TV_DISK));

        Ok(CanonicalStats::Sonarr(SonarrStats::from_parts(
            &series, version, secondary,
        )))
    }
}
