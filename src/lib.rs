// dashstat library - Public API

// Re-export error types
pub mod error;
pub use error::{ErrorKind, Result, StatsError};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;
pub use core::{
    fetch_stats, redact, test_connection, CanonicalStats, ConnectionTestResult, MemoryStore,
    ProviderConfig, ProviderKind, SqliteStore, StatsService, WidgetStore,
};

/// Initialize logging. `RUST_LOG` wins over the default level
/// (`warn`, or `debug` when `verbose`).
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Stderr)
        .try_init();
}
