use anyhow::{Context, Result};

use crate::core::{Config, ProviderKind, SqliteStore, StatsService};
use crate::ui::print_json;

fn open_service(matches: &clap::ArgMatches, config: &Config) -> Result<StatsService> {
    let db_path = config.resolve_db_path(matches.get_one::<String>("db").map(String::as_str));
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open dashboard database {}", db_path.display()))?;
    Ok(StatsService::new(store))
}

fn widget_id(matches: &clap::ArgMatches) -> Result<i64> {
    matches
        .get_one::<i64>("id")
        .copied()
        .context("Widget id is required")
}

/// Proxy read of a stored widget
pub fn execute(matches: &clap::ArgMatches, config: &Config, pretty: bool) -> Result<()> {
    let id = widget_id(matches)?;
    let expected = matches
        .get_one::<String>("expect")
        .map(|tag| tag.parse::<ProviderKind>())
        .transpose()?;

    let service = open_service(matches, config)?;
    let stats = service
        .fetch_widget_stats(id, expected)
        .with_context(|| format!("Failed to fetch stats for widget {}", id))?;
    print_json(&stats, pretty)
}

/// Stored widget configuration with credentials removed
pub fn execute_config(matches: &clap::ArgMatches, config: &Config, pretty: bool) -> Result<()> {
    let id = widget_id(matches)?;
    let service = open_service(matches, config)?;
    let redacted = service.widget_config(id)?;
    print_json(&redacted, pretty)
}

/// Host metrics: the first dashboard's metrics agent, else the local host
pub fn execute_system(matches: &clap::ArgMatches, config: &Config, pretty: bool) -> Result<()> {
    let db_path = config.resolve_db_path(matches.get_one::<String>("db").map(String::as_str));

    // A missing database only means there is no agent configured
    let report = match SqliteStore::open(&db_path) {
        Ok(store) => StatsService::new(store).system_stats(),
        Err(e) => {
            log::info!("{}, using local stats", e);
            StatsService::new(crate::core::MemoryStore::new()).system_stats()
        }
    };
    print_json(&report, pretty)
}
