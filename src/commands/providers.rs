use anyhow::Result;
use serde::Serialize;

use crate::core::ProviderKind;
use crate::ui::print_json;

#[derive(Serialize)]
struct ProviderEntry {
    tag: &'static str,
    name: &'static str,
}

/// List supported provider tags
pub fn execute(pretty: bool) -> Result<()> {
    let entries: Vec<ProviderEntry> = ProviderKind::ALL
        .iter()
        .map(|kind| ProviderEntry {
            tag: kind.as_str(),
            name: kind.display_name(),
        })
        .collect();
    print_json(&entries, pretty)
}
