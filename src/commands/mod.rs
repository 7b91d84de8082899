pub mod fetch;
pub mod input;
pub mod providers;
pub mod redact;
pub mod widget;

use anyhow::{Context, Result};

use crate::core::ProviderKind;

/// The positional `<provider>` argument shared by `fetch` and `test`
pub(crate) fn provider_arg(matches: &clap::ArgMatches) -> Result<ProviderKind> {
    let tag = matches
        .get_one::<String>("provider")
        .context("Provider type is required")?;
    Ok(tag.parse()?)
}
