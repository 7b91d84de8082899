//! Entry points used by callers: ad-hoc reads, connection tests and
//! widget-scoped reads through the persistence collaborator.

use log::{debug, info};
use serde::Serialize;
use serde_json::Value;

use super::provider_config::ProviderConfig;
use super::providers::{provider_for, CanonicalStats, ProviderKind};
use super::redact::{redact, RedactedConfig};
use super::store::WidgetStore;
use super::system::{collect_system_stats, SystemStatsReport};
use crate::error::{ErrorKind, Result, StatsError};

/// Validate, then run a full read
pub fn fetch_stats(kind: ProviderKind, config: &ProviderConfig) -> Result<CanonicalStats> {
    let provider = provider_for(kind);
    provider.validate(config)?;
    debug!("Fetching {} stats", kind);
    provider.fetch_stats(config)
}

/// Outcome of checking an unsaved configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub detail: String,
    /// Failure category, absent on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl ConnectionTestResult {
    fn ok(kind: ProviderKind) -> Self {
        Self {
            success: true,
            detail: format!("Successfully connected to {}", kind.display_name()),
            kind: None,
        }
    }

    fn failed(err: &StatsError) -> Self {
        Self {
            success: false,
            detail: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}

/// Check a raw, unsaved configuration end to end. Failures are reported in the
/// result, never returned as errors, and nothing is persisted.
pub fn test_connection(kind: ProviderKind, raw_config: &Value) -> ConnectionTestResult {
    let outcome = ProviderConfig::from_value(raw_config.clone()).and_then(|config| {
        let provider = provider_for(kind);
        provider.validate(&config)?;
        provider.test_connection(&config)
    });

    match outcome {
        Ok(()) => {
            info!("Connection test for {} succeeded", kind);
            ConnectionTestResult::ok(kind)
        }
        Err(e) => {
            info!("Connection test for {} failed: {}", kind, e);
            ConnectionTestResult::failed(&e)
        }
    }
}

/// Widget-scoped operations over an injected store
pub struct StatsService {
    store: Box<dyn WidgetStore>,
}

impl StatsService {
    pub fn new<S: WidgetStore + 'static>(store: S) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    fn widget(&self, id: i64) -> Result<(ProviderKind, ProviderConfig)> {
        let record = self
            .store
            .widget_by_id(id)?
            .ok_or_else(|| StatsError::not_found("Widget not found"))?;
        let kind = record.kind.parse::<ProviderKind>()?;
        Ok((kind, record.config))
    }

    /// Proxy read for a stored widget. With `expected` set, a widget of another
    /// type is rejected before any network call.
    pub fn fetch_widget_stats(
        &self,
        id: i64,
        expected: Option<ProviderKind>,
    ) -> Result<CanonicalStats> {
        let (kind, config) = self.widget(id)?;
        if let Some(expected) = expected {
            if kind != expected {
                return Err(StatsError::validation(format!(
                    "Widget is not {}",
                    expected.widget_noun()
                )));
            }
        }
        fetch_stats(kind, &config)
    }

    /// Stored configuration with credentials removed
    pub fn widget_config(&self, id: i64) -> Result<RedactedConfig> {
        let record = self
            .store
            .widget_by_id(id)?
            .ok_or_else(|| StatsError::not_found("Widget not found"))?;
        Ok(redact(record.config.as_map()))
    }

    pub fn system_stats(&self) -> SystemStatsReport {
        collect_system_stats(self.store.as_ref())
    }
}
