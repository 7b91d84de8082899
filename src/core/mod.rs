// Core aggregation logic

pub mod config;
pub mod provider_config;
pub mod providers;
pub mod redact;
pub mod service;
pub mod stats;
pub mod store;
pub mod system;
pub mod transport;

// Re-export commonly used items
pub use config::Config;
pub use provider_config::ProviderConfig;
pub use providers::{provider_for, CanonicalStats, Provider, ProviderKind};
pub use redact::{redact, RedactedConfig};
pub use service::{fetch_stats, test_connection, ConnectionTestResult, StatsService};
pub use store::{MemoryStore, SqliteStore, WidgetRecord, WidgetStore};
pub use system::{SystemSource, SystemStatsReport};
