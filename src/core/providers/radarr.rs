//! Radarr movie manager.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::arr::{ArrApi, ArrSettings, HealthCheck, SecondaryStats};
use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::DiskNeedle;
use crate::core::transport::new_client;
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(15);

const MOVIES_DISK: DiskNeedle<'static> = DiskNeedle {
    path: "/movies",
    label: "movies",
    fallback_index: 0,
};

pub struct RadarrProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarrStats {
    pub total_movies: u64,
    pub downloaded_movies: u64,
    pub missing_movies: u64,
    pub queued_items: u64,
    pub download_progress: f64,
    pub total_storage: u64,
    pub free_storage: u64,
    pub version: String,
    pub health_alerts: Vec<HealthCheck>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Movie {
    #[serde(default)]
    has_file: bool,
    #[serde(default)]
    downloaded: bool,
    #[serde(default)]
    monitored: bool,
}

impl RadarrStats {
    fn from_parts(movies: &[Movie], version: String, secondary: SecondaryStats) -> Self {
        let mut stats = RadarrStats {
            total_movies: movies.len() as u64,
            queued_items: secondary.queued_items,
            download_progress: secondary.download_progress,
            total_storage: secondary.total_storage,
            free_storage: secondary.free_storage,
            version,
            health_alerts: secondary.health_alerts,
            ..Default::default()
        };

        for movie in movies {
            if movie.has_file || movie.downloaded {
                stats.downloaded_movies += 1;
            } else if movie.monitored {
                stats.missing_movies += 1;
            }
        }

        stats
    }
}

impl Provider for RadarrProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Radarr
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        ArrSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = ArrSettings::from_config(config)?;
        let client = new_client(TIMEOUT, true)?;
        let api = ArrApi::new(&client, &settings, "/api/v3");

        let version = api.version_best_effort();
        let movies: Vec<Movie> = api
            .get("movie")
            .map_err(|e| e.during("failed to fetch movies data"))?;
        let secondary = api.secondary("queue", &settings.needle(MOVIES_DISK));

        Ok(CanonicalStats::Radarr(RadarrStats::from_parts(
            &movies, version, secondary,
        )))
    }
}
