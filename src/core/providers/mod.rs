//! Provider adapters.
//!
//! Each external service type implements [`Provider`]: it validates its
//! configuration, authenticates, issues its fixed sequence of sub-requests and
//! folds the payloads into one [`CanonicalStats`] variant. Sub-requests run one
//! after another; fatal ones abort the read, best-effort ones degrade their
//! fields to defaults.

mod adguard;
mod arr;
mod glances;
mod immich;
mod lidarr;
mod prowlarr;
mod qbittorrent;
mod radarr;
mod sonarr;
mod transmission;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::provider_config::ProviderConfig;
use crate::error::{Result, StatsError};

pub use adguard::{AdGuardProvider, AdGuardStats};
pub use arr::HealthCheck;
pub use glances::{
    transform_glances_data, CpuStats, GlancesProvider, MemoryStats, SystemStats, UptimeStats,
};
pub(crate) use glances::GlancesSettings;
pub use immich::{
    ImmichProvider, ImmichServerStatistics, ImmichStats, ImmichStorage, ImmichUserUsage,
};
pub use lidarr::{LidarrProvider, LidarrStats};
pub use prowlarr::{ProwlarrProvider, ProwlarrStats};
pub use qbittorrent::QBittorrentProvider;
pub use radarr::{RadarrProvider, RadarrStats};
pub use sonarr::{SonarrProvider, SonarrStats};
pub use transmission::TransmissionProvider;

/// Provider type tag, as stored in a widget's `type` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    AdGuardHome,
    Radarr,
    Sonarr,
    Lidarr,
    Prowlarr,
    QBittorrent,
    Transmission,
    Immich,
    Glances,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 9] = [
        ProviderKind::AdGuardHome,
        ProviderKind::Radarr,
        ProviderKind::Sonarr,
        ProviderKind::Lidarr,
        ProviderKind::Prowlarr,
        ProviderKind::QBittorrent,
        ProviderKind::Transmission,
        ProviderKind::Immich,
        ProviderKind::Glances,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::AdGuardHome => "adguard-home",
            ProviderKind::Radarr => "radarr",
            ProviderKind::Sonarr => "sonarr",
            ProviderKind::Lidarr => "lidarr",
            ProviderKind::Prowlarr => "prowlarr",
            ProviderKind::QBittorrent => "qbittorrent",
            ProviderKind::Transmission => "transmission",
            ProviderKind::Immich => "immich",
            ProviderKind::Glances => "glances",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::AdGuardHome => "AdGuard Home",
            ProviderKind::Radarr => "Radarr",
            ProviderKind::Sonarr => "Sonarr",
            ProviderKind::Lidarr => "Lidarr",
            ProviderKind::Prowlarr => "Prowlarr",
            ProviderKind::QBittorrent => "qBittorrent",
            ProviderKind::Transmission => "Transmission",
            ProviderKind::Immich => "Immich",
            ProviderKind::Glances => "Glances",
        }
    }

    /// "a Radarr widget" / "an Immich widget"
    pub fn widget_noun(&self) -> String {
        let name = self.display_name();
        let article = match name.chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
            _ => "a",
        };
        format!("{} {} widget", article, name)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_lowercase();
        ProviderKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
            .ok_or_else(|| StatsError::validation(format!("unknown provider type '{}'", s)))
    }
}

/// Normalized statistics, one variant per provider. Serializes as the flat
/// provider-specific object dashboard clients already consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalStats {
    AdGuard(AdGuardStats),
    Radarr(RadarrStats),
    Sonarr(SonarrStats),
    Lidarr(LidarrStats),
    Prowlarr(ProwlarrStats),
    Torrent(TorrentStats),
    Immich(ImmichStats),
    System(SystemStats),
}

/// Shared by both torrent clients
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TorrentStats {
    pub downloading_torrents: u64,
    pub seeding_torrents: u64,
    pub error_torrents: u64,
    pub total_torrents: u64,
    /// bytes per second
    pub download_speed: f64,
    /// bytes per second
    pub upload_speed: f64,
}

/// Capability set every adapter implements
pub trait Provider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Reject a configuration missing required keys. Never touches the network.
    fn validate(&self, config: &ProviderConfig) -> Result<()>;

    /// Full read: all sub-requests, normalization and alerts
    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats>;

    /// End-to-end check of a configuration. Providers with a cheaper probe
    /// override this; the default runs a full read.
    fn test_connection(&self, config: &ProviderConfig) -> Result<()> {
        self.fetch_stats(config).map(|_| ())
    }
}

/// Adapter for a provider tag
pub fn provider_for(kind: ProviderKind) -> Box<dyn Provider> {
    match kind {
        ProviderKind::AdGuardHome => Box::new(AdGuardProvider),
        ProviderKind::Radarr => Box::new(RadarrProvider),
        ProviderKind::Sonarr => Box::new(SonarrProvider),
        ProviderKind::Lidarr => Box::new(LidarrProvider),
        ProviderKind::Prowlarr => Box::new(ProwlarrProvider),
        ProviderKind::QBittorrent => Box::new(QBittorrentProvider),
        ProviderKind::Transmission => Box::new(TransmissionProvider),
        ProviderKind::Immich => Box::new(ImmichProvider),
        ProviderKind::Glances => Box::new(GlancesProvider),
    }
}
