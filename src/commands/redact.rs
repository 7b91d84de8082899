use anyhow::{Context, Result};

use super::input::read_config;
use crate::core::redact;
use crate::ui::print_json;

/// Strip credential-like keys from an arbitrary JSON object
pub fn execute(matches: &clap::ArgMatches, pretty: bool) -> Result<()> {
    let value = read_config(matches)?;
    let map = value
        .as_object()
        .context("Configuration must be a JSON object")?;
    print_json(&redact(map), pretty)
}
