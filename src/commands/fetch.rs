use anyhow::{Context, Result};

use super::input::read_config;
use super::provider_arg;
use crate::core::{fetch_stats, ProviderConfig};
use crate::ui::print_json;

/// Ad-hoc read with a configuration from the command line
pub fn execute(matches: &clap::ArgMatches, pretty: bool) -> Result<()> {
    let kind = provider_arg(matches)?;
    let config = ProviderConfig::from_value(read_config(matches)?)?;

    let stats = fetch_stats(kind, &config)
        .with_context(|| format!("Failed to fetch {} stats", kind.display_name()))?;
    print_json(&stats, pretty)
}
