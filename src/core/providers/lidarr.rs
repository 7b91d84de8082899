//! Lidarr music manager.
//!
//! Uses the v1 API. Artist statistics carry no per-album missing count, so
//! `missingAlbums` stays 0, and the running version is not reported.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::arr::{ArrApi, ArrSettings, HealthCheck, SecondaryStats};
use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::DiskNeedle;
use crate::core::transport::new_client;
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(15);
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const MUSIC_DISK: DiskNeedle<'static> = DiskNeedle {
    path: "/music",
    label: "music",
    fallback_index: 3,
};

pub struct LidarrProvider;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LidarrStats {
    pub queued_items: u64,
    pub download_progress: f64,
    pub missing_albums: u64,
    pub monitored_artists: u64,
    pub total_albums: u64,
    pub total_tracks: u64,
    pub tracks_with_files: u64,
    pub free_storage: u64,
    pub total_storage: u64,
    pub health_alerts: Vec<HealthCheck>,
}

#[derive(Debug, Default, Deserialize)]
struct Artist {
    #[serde(default)]
    monitored: bool,
    #[serde(default)]
    statistics: ArtistStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtistStatistics {
    #[serde(default)]
    album_count: u64,
    #[serde(default)]
    track_file_count: u64,
    #[serde(default)]
    total_track_count: u64,
}

impl LidarrStats {
    fn from_parts(artists: &[Artist], secondary: SecondaryStats) -> Self {
        let mut stats = LidarrStats {
            queued_items: secondary.queued_items,
            download_progress: secondary.download_progress,
            free_storage: secondary.free_storage,
            total_storage: secondary.total_storage,
            health_alerts: secondary.health_alerts,
            ..Default::default()
        };

        for artist in artists {
            if artist.monitored {
                stats.monitored_artists += 1;
            }
            stats.total_albums += artist.statistics.album_count;
            stats.total_tracks += artist.statistics.total_track_count;
            stats.tracks_with_files += artist.statistics.track_file_count;
        }

        stats
    }
}

impl Provider for LidarrProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Lidarr
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        ArrSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = ArrSettings::from_config(config)?;
        let client = new_client(TIMEOUT, true)?;
        let api = ArrApi::new(&client, &settings, "/api/v1");

        let artists: Vec<Artist> = api
            .get("artist")
            .map_err(|e| e.during("failed to fetch artists"))?;
        let secondary = api.secondary("queue?pageSize=100", &settings.needle(MUSIC_DISK));

        Ok(CanonicalStats::Lidarr(LidarrStats::from_parts(
            &artists, secondary,
        )))
    }

    /// Only asks for the system status; a rejected key surfaces as `Auth`
    fn test_connection(&self, config: &ProviderConfig) -> Result<()> {
        let settings = ArrSettings::from_config(config)?;
        let client = new_client(PROBE_TIMEOUT, true)?;
        ArrApi::new(&client, &settings, "/api/v1")
            .system_version()
            .map(|_| ())
            .map_err(|e| e.during("cannot reach Lidarr"))
    }
}
