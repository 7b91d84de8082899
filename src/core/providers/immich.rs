//! Immich photo server.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::Alert;
use crate::core::transport::{best_effort, new_client, HttpClient};
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(30);

pub struct ImmichProvider;

#[derive(Debug, Clone)]
struct ImmichSettings {
    server_url: String,
    api_key: String,
}

impl ImmichSettings {
    fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            server_url: config.server_url("serverUrl")?,
            api_key: config.require_str("apiKey")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmichServerStatistics {
    #[serde(default)]
    pub photos: u64,
    #[serde(default)]
    pub videos: u64,
    #[serde(default)]
    pub usage: u64,
    #[serde(default)]
    pub usage_by_user: Vec<ImmichUserUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmichUserUsage {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub photos: u64,
    #[serde(default)]
    pub videos: u64,
    #[serde(default)]
    pub usage: u64,
}

/// Disk figures come pre-formatted by the server ("1.2 TiB")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImmichStorage {
    #[serde(default, rename = "diskAvailable")]
    pub disk_available: String,
    #[serde(default, rename = "diskSize")]
    pub disk_size: String,
    #[serde(default, rename = "diskUsagePercentage")]
    pub disk_usage_percentage: f64,
    #[serde(default, rename = "diskUse")]
    pub disk_use: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmichStats {
    pub server_stats: ImmichServerStatistics,
    pub storage: ImmichStorage,
    pub users: u64,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Deserialize)]
struct About {
    #[serde(default)]
    version: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionCheck {
    #[serde(default)]
    release_version: String,
}

fn strip_v(version: &str) -> &str {
    let version = version.trim();
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

/// Alerts in a fixed order: unread notifications, then an available update
fn build_alerts(notifications: Option<usize>, running: Option<&str>, latest: Option<&str>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if let Some(count) = notifications.filter(|n| *n > 0) {
        alerts.push(Alert::warning(format!(
            "You have {} unread notifications",
            count
        )));
    }

    let running = running.filter(|v| !v.trim().is_empty());
    let latest = latest.filter(|v| !v.trim().is_empty());
    if let (Some(running), Some(latest)) = (running, latest) {
        if strip_v(running) != strip_v(latest) {
            alerts.push(Alert::warning(format!(
                "A new Immich version {} is available! You are running version {}.",
                latest, running
            )));
        }
    }

    alerts
}

impl ImmichProvider {
    fn get<T: DeserializeOwned>(
        client: &HttpClient,
        settings: &ImmichSettings,
        endpoint: &str,
    ) -> Result<T> {
        let url = format!("{}{}", settings.server_url, endpoint);
        client.get_json(
            client
                .get(&url)
                .header("X-API-Key", &settings.api_key)
                .header("Accept", "application/json"),
        )
    }

    fn fetch(settings: &ImmichSettings) -> Result<ImmichStats> {
        let client = new_client(TIMEOUT, true)?;

        let server_stats: ImmichServerStatistics =
            Self::get(&client, settings, "/api/server/statistics")
                .map_err(|e| e.during("failed to fetch server statistics"))?;
        let storage: ImmichStorage = Self::get(&client, settings, "/api/server/storage")
            .map_err(|e| e.during("failed to fetch storage"))?;

        let about = best_effort(
            "Immich about",
            Self::get::<About>(&client, settings, "/api/server/about"),
        );
        let notifications = best_effort(
            "Immich notifications",
            Self::get::<Vec<Value>>(&client, settings, "/api/notifications"),
        );
        let version_check = best_effort(
            "Immich version check",
            Self::get::<VersionCheck>(&client, settings, "/api/server/version-check"),
        );

        let alerts = build_alerts(
            notifications.map(|n| n.len()),
            about.as_ref().map(|a| a.version.as_str()),
            version_check.as_ref().map(|v| v.release_version.as_str()),
        );

        Ok(ImmichStats {
            users: server_stats.usage_by_user.len() as u64,
            server_stats,
            storage,
            alerts,
        })
    }
}

impl Provider for ImmichProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Immich
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        ImmichSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = ImmichSettings::from_config(config)?;
        Self::fetch(&settings).map(CanonicalStats::Immich)
    }
}
