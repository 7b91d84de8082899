//! Host metrics for the dashboard header.
//!
//! Prefers the metrics agent configured on the first dashboard and falls back
//! to reading the local host when there is none or it cannot be reached.

mod local;

use log::{debug, info, warn};
use serde::Serialize;

use super::providers::{GlancesProvider, GlancesSettings, SystemStats};
use super::store::WidgetStore;

pub use local::{collect_local_stats, select_cpu_temperature};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemSource {
    Glances,
    Local,
}

/// `{success, data, source}` envelope dashboard clients expect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatsReport {
    pub success: bool,
    pub data: SystemStats,
    pub source: SystemSource,
}

fn from_agent(store: &dyn WidgetStore) -> Option<SystemStats> {
    let config = match store.first_dashboard_metrics_config() {
        Ok(Some(config)) => config,
        Ok(None) => {
            debug!("No metrics agent configured, using local stats");
            return None;
        }
        Err(e) => {
            warn!("Could not read metrics agent configuration: {}", e);
            return None;
        }
    };

    let result = GlancesSettings::from_config(&config).and_then(|s| GlancesProvider::fetch(&s));
    match result {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Failed to fetch stats from Glances, using local stats: {}", e);
            None
        }
    }
}

/// Never fails: the local fallback always yields a report
pub fn collect_system_stats(store: &dyn WidgetStore) -> SystemStatsReport {
    let (data, source) = match from_agent(store) {
        Some(data) => (data, SystemSource::Glances),
        None => (collect_local_stats(), SystemSource::Local),
    };
    info!("System stats served from {:?} source", source);

    SystemStatsReport {
        success: true,
        data,
        source,
    }
}
