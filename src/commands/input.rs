//! Provider configuration supplied on the command line.
//!
//! `--config FILE` (or `-` for stdin) supplies a JSON object; each
//! `--set key=value` then overrides one key. Values that parse as JSON keep
//! their type, anything else is taken as a string.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Read};

pub fn read_config(matches: &clap::ArgMatches) -> Result<Value> {
    let mut value = match matches.get_one::<String>("config") {
        Some(source) => load_source(source)?,
        None => Value::Object(Map::new()),
    };

    if let Some(assignments) = matches.get_many::<String>("set") {
        let map = value
            .as_object_mut()
            .context("--set needs the configuration to be a JSON object")?;
        for assignment in assignments {
            let (key, raw) = parse_assignment(assignment)?;
            map.insert(key, raw);
        }
    }

    Ok(value)
}

fn load_source(source: &str) -> Result<Value> {
    let text = if source == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read configuration from stdin")?;
        buffer
    } else {
        fs::read_to_string(source)
            .with_context(|| format!("Failed to read configuration file: {}", source))?
    };

    if text.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(&text).with_context(|| format!("Configuration in {} is not valid JSON", source))
}

fn parse_assignment(assignment: &str) -> Result<(String, Value)> {
    let Some((key, raw)) = assignment.split_once('=') else {
        bail!("Expected key=value, got '{}'", assignment);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", assignment);
    }

    // Bare words like `admin` are strings; `8080`, `true`, `{"a":1}` keep their JSON type
    let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), value))
}
