//! Glances system metrics agent.
//!
//! `/api/4/all` returns a large untyped tree whose shape drifts between Glances
//! versions, so it is walked defensively: a missing or mistyped leaf leaves the
//! corresponding field at zero instead of failing the read.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use super::{CanonicalStats, Provider, ProviderKind};
use crate::core::provider_config::ProviderConfig;
use crate::core::stats::{bytes_to_gb, short_uptime_display, uptime_days};
use crate::core::transport::{new_client, HttpClient};
use crate::error::Result;

const TIMEOUT: Duration = Duration::from_secs(10);
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const CPU_SENSOR_LABELS: &[&str] = &["Package id 0", "Core 0"];

pub struct GlancesProvider;

#[derive(Debug, Clone)]
pub(crate) struct GlancesSettings {
    url: String,
    credentials: Option<(String, String)>,
}

impl GlancesSettings {
    pub(crate) fn from_config(config: &ProviderConfig) -> Result<Self> {
        let credentials = match (config.optional_str("username"), config.optional_str("password")) {
            (Some(user), Some(pass)) => Some((user.to_string(), pass.to_string())),
            _ => None,
        };
        Ok(Self {
            url: config.server_url("url")?,
            credentials,
        })
    }
}

/// Host metrics, shared by the Glances adapter and the local fallback
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    pub cpu: CpuStats,
    pub memory: MemoryStats,
    pub uptime: UptimeStats,
    pub load_average: f64,
    pub processes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CpuStats {
    /// percent
    pub usage: f64,
    /// degrees Celsius, 0 when unknown
    pub temperature: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MemoryStats {
    /// GB
    pub used: f64,
    /// GB
    pub total: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UptimeStats {
    pub days: u64,
    pub display: String,
}

fn number_at(data: &Value, section: &str, key: &str) -> Option<f64> {
    data.get(section)?.get(key)?.as_f64()
}

/// Fold a `/api/4/all` document into [`SystemStats`]
pub fn transform_glances_data(data: &Value) -> SystemStats {
    let mut stats = SystemStats::default();

    if let Some(usage) = number_at(data, "cpu", "total") {
        stats.cpu.usage = usage;
    }

    if let Some(used) = number_at(data, "mem", "used") {
        stats.memory.used = bytes_to_gb(used);
    }
    if let Some(total) = number_at(data, "mem", "total") {
        stats.memory.total = bytes_to_gb(total);
    }
    if let Some(percent) = number_at(data, "mem", "percent") {
        stats.memory.percentage = percent;
    }

    match data.get("uptime") {
        Some(Value::Number(n)) => {
            let seconds = n.as_f64().filter(|s| *s > 0.0).unwrap_or(0.0) as u64;
            stats.uptime.days = uptime_days(seconds);
            stats.uptime.display = short_uptime_display(seconds);
        }
        // Glances 4 already formats it ("3 days, 4:05:06")
        Some(Value::String(text)) => stats.uptime.display = text.clone(),
        _ => {}
    }

    if let Some(load) = number_at(data, "load", "min1") {
        stats.load_average = load;
    }
    if let Some(running) = number_at(data, "processcount", "running") {
        stats.processes = running.max(0.0) as u64;
    }

    if let Some(sensors) = data.get("sensors").and_then(Value::as_array) {
        let reading = sensors.iter().find_map(|sensor| {
            let label = sensor.get("label")?.as_str()?;
            if CPU_SENSOR_LABELS.contains(&label) {
                sensor.get("value")?.as_f64()
            } else {
                None
            }
        });
        if let Some(temperature) = reading {
            stats.cpu.temperature = temperature;
        }
    }

    stats
}

impl GlancesProvider {
    fn request(client: &HttpClient, settings: &GlancesSettings) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}/api/4/all", settings.url);
        let request = client.get(&url);
        match &settings.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    /// Full metrics read, also used by the system stats path
    pub(crate) fn fetch(settings: &GlancesSettings) -> Result<SystemStats> {
        let client = new_client(TIMEOUT, false)?;
        let data: Value = client
            .get_json(Self::request(&client, settings))
            .map_err(|e| e.during("failed to fetch Glances data"))?;
        Ok(transform_glances_data(&data))
    }
}

impl Provider for GlancesProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Glances
    }

    fn validate(&self, config: &ProviderConfig) -> Result<()> {
        GlancesSettings::from_config(config).map(|_| ())
    }

    fn fetch_stats(&self, config: &ProviderConfig) -> Result<CanonicalStats> {
        let settings = GlancesSettings::from_config(config)?;
        Self::fetch(&settings).map(CanonicalStats::System)
    }

    /// Status-only probe; the body is not decoded
    fn test_connection(&self, config: &ProviderConfig) -> Result<()> {
        let settings = GlancesSettings::from_config(config)?;
        let client = new_client(PROBE_TIMEOUT, false)?;
        client
            .send_checked(Self::request(&client, &settings))
            .map(|_| ())
            .map_err(|e| e.during("cannot reach Glances"))
    }
}
