//! Removal of credential-like keys from widget configuration before it is
//! handed back to a caller.

use serde_json::{Map, Value};

/// Substrings that mark a key as sensitive, matched against the lowercase key
pub const SENSITIVE_FIELDS: &[&str] = &[
    "password",
    "token",
    "api_key",
    "apikey",
    "api_token",
    "secret",
    "auth",
    "credential",
    "key",
    "private_key",
    "access_token",
    "refresh_token",
];

/// Configuration with every sensitive key removed
pub type RedactedConfig = Map<String, Value>;

pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_lowercase();
    SENSITIVE_FIELDS.iter().any(|field| lower.contains(field))
}

/// Return a copy of `config` without sensitive keys, recursing into nested
/// objects. Arrays and scalars are copied as-is.
pub fn redact(config: &Map<String, Value>) -> RedactedConfig {
    config
        .iter()
        .filter(|(key, _)| !is_sensitive_key(key))
        .map(|(key, value)| {
            let value = match value {
                Value::Object(nested) => Value::Object(redact(nested)),
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}
