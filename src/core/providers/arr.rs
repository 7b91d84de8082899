//! Plumbing shared by the *arr media managers (Radarr, Sonarr, Lidarr).
//!
//! They expose the same status, queue, disk-space and health endpoints under
//! a versioned API root, authenticated with the `X-Api-Key` header.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::provider_config::ProviderConfig;
use crate::core::stats::{queue_progress, select_disk_index, DiskNeedle};
use crate::core::transport::{best_effort, HttpClient};
use crate::error::Result;

#[derive(Debug, Clone)]
pub(super) struct ArrSettings {
    pub server_url: String,
    pub api_key: String,
    /// Root folder whose disk should be reported
    pub storage_path: Option<String>,
}

impl ArrSettings {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            server_url: config.server_url("serverUrl")?,
            api_key: config.require_str("apiKey")?.to_string(),
            storage_path: config.optional_str("storagePath").map(str::to_string),
        })
    }

    /// Default needle, narrowed to the configured root folder when there is one
    pub fn needle<'a>(&'a self, default: DiskNeedle<'a>) -> DiskNeedle<'a> {
        match self.storage_path.as_deref() {
            Some(path) => DiskNeedle {
                path,
                label: "",
                ..default
            },
            None => default,
        }
    }
}

/// Entry of the `/health` list, passed through to callers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    #[serde(default)]
    pub source: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "wikiUrl")]
    pub wiki_url: String,
}

#[derive(Debug, Deserialize)]
struct SystemStatus {
    #[serde(default)]
    version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Queue {
    #[serde(default)]
    total_records: u64,
    #[serde(default)]
    records: Vec<QueueRecord>,
}

#[derive(Debug, Deserialize)]
struct QueueRecord {
    #[serde(default)]
    size: f64,
    #[serde(default)]
    sizeleft: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DiskSpace {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub free_space: u64,
    #[serde(default)]
    pub total_space: u64,
}

/// Fields every *arr read reports besides its entity counts
#[derive(Debug, Default)]
pub(super) struct SecondaryStats {
    pub queued_items: u64,
    pub download_progress: f64,
    pub total_storage: u64,
    pub free_storage: u64,
    pub health_alerts: Vec<HealthCheck>,
}

pub(super) struct ArrApi<'a> {
    client: &'a HttpClient,
    base: String,
    api_key: &'a str,
}

impl<'a> ArrApi<'a> {
    /// `api_root` is `/api/v3` or `/api/v1`
    pub fn new(client: &'a HttpClient, settings: &'a ArrSettings, api_root: &str) -> Self {
        Self {
            client,
            base: format!("{}{}", settings.server_url, api_root),
            api_key: &settings.api_key,
        }
    }

    pub fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = format!("{}/{}", self.base, endpoint);
        self.client.get_json(
            self.client
                .get(&url)
                .header("X-Api-Key", self.api_key)
                .header("Accept", "application/json"),
        )
    }

    pub fn system_version(&self) -> Result<String> {
        self.get::<SystemStatus>("system/status").map(|s| s.version)
    }

    /// Running version, empty when the status call fails
    pub fn version_best_effort(&self) -> String {
        best_effort("system status", self.system_version()).unwrap_or_default()
    }

    /// Queue, disk space and health, each degrading on its own
    pub fn secondary(&self, queue_endpoint: &str, needle: &DiskNeedle) -> SecondaryStats {
        let mut stats = SecondaryStats::default();

        if let Some(queue) = best_effort("queue", self.get::<Queue>(queue_endpoint)) {
            stats.queued_items = queue.total_records;
            stats.download_progress =
                queue_progress(queue.records.iter().map(|r| (r.size, r.sizeleft)));
        }

        if let Some(disks) = best_effort("disk space", self.get::<Vec<DiskSpace>>("diskspace")) {
            if let Some(disk) = pick_disk(&disks, needle) {
                stats.total_storage = disk.total_space;
                stats.free_storage = disk.free_space;
            }
        }

        stats.health_alerts = best_effort("health", self.get("health")).unwrap_or_default();

        stats
    }
}

pub(super) fn pick_disk<'d>(disks: &'d [DiskSpace], needle: &DiskNeedle) -> Option<&'d DiskSpace> {
    let pairs: Vec<(&str, &str)> = disks
        .iter()
        .map(|d| (d.path.as_str(), d.label.as_str()))
        .collect();
    select_disk_index(&pairs, needle).and_then(|index| disks.get(index))
}
