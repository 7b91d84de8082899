//! Per-widget provider configuration.
//!
//! Stored by the persistence collaborator as opaque JSON text. Adapters read it
//! through the typed accessors below; a value only counts as present when it is
//! a non-empty string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::error::{Result, StatsError};

/// Untyped key/value mapping attached to one widget
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderConfig(Map<String, Value>);

impl ProviderConfig {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Build from an arbitrary JSON value; only objects are accepted
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(StatsError::validation(format!(
                "configuration must be a JSON object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Parse stored configuration text. Empty text is an empty mapping.
    pub fn from_json_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value = serde_json::from_str(text)
            .map_err(|e| StatsError::validation(format!("configuration is not valid JSON: {}", e)))?;
        Self::from_value(value)
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// A string value that is present and non-empty
    pub fn optional_str(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.optional_str(key)
            .ok_or_else(|| StatsError::validation(format!("{} is required", key)))
    }

    /// Required base URL, validated and without trailing slashes
    pub fn server_url(&self, key: &str) -> Result<String> {
        let raw = self.require_str(key)?;
        normalize_base_url(raw)
            .map_err(|reason| StatsError::validation(format!("{} is invalid: {}", key, reason)))
    }
}

impl From<Map<String, Value>> for ProviderConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Validate an absolute http(s) URL and strip trailing slashes
pub fn normalize_base_url(raw: &str) -> std::result::Result<String, String> {
    let parsed = Url::parse(raw).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if parsed.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
