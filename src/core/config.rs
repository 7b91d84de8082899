use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Environment variables that override the database path, in priority order
pub const DB_PATH_ENV_VARS: &[&str] = &["DASHSTAT_DB_PATH", "DB_PATH"];

pub const DEFAULT_DB_PATH: &str = "./dashboard.db";

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Dashboard SQLite database
    #[serde(default)]
    pub db_path: Option<String>,
    /// Indent JSON output by default
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    /// Load from the user config directory, falling back to defaults when the
    /// file is absent, empty or unreadable
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring malformed config file {:?}: {}", config_path, e);
            Config::default()
        }))
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("dashstat").join("config.json"))
    }

    /// Database path: explicit argument, then environment, then config file,
    /// then the default
    pub fn resolve_db_path(&self, explicit: Option<&str>) -> PathBuf {
        let from_env = || {
            DB_PATH_ENV_VARS
                .iter()
                .filter_map(|var| env::var(var).ok())
                .find(|value| !value.trim().is_empty())
        };

        explicit
            .map(str::to_string)
            .or_else(from_env)
            .or_else(|| self.db_path.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }
}
