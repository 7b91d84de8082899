//! Read access to persisted widgets and dashboards.
//!
//! The aggregation layer never writes: it only needs a widget's type and
//! configuration, and the metrics-agent settings of the first dashboard.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use log::debug;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};

use super::provider_config::ProviderConfig;
use crate::error::{Result, StatsError};

/// A stored widget: its declared type tag and opaque configuration
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRecord {
    pub id: i64,
    pub kind: String,
    pub config: ProviderConfig,
}

/// Persistence collaborator injected into the service
pub trait WidgetStore: Send + Sync {
    fn widget_by_id(&self, id: i64) -> Result<Option<WidgetRecord>>;

    /// Metrics-agent configuration of the first (lowest id) live dashboard
    fn first_dashboard_metrics_config(&self) -> Result<Option<ProviderConfig>>;
}

/// In-process store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    widgets: HashMap<i64, WidgetRecord>,
    metrics_config: Option<ProviderConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_widget(mut self, id: i64, kind: &str, config: ProviderConfig) -> Self {
        self.widgets.insert(
            id,
            WidgetRecord {
                id,
                kind: kind.to_string(),
                config,
            },
        );
        self
    }

    pub fn with_metrics_config(mut self, config: ProviderConfig) -> Self {
        self.metrics_config = Some(config);
        self
    }
}

impl WidgetStore for MemoryStore {
    fn widget_by_id(&self, id: i64) -> Result<Option<WidgetRecord>> {
        Ok(self.widgets.get(&id).cloned())
    }

    fn first_dashboard_metrics_config(&self) -> Result<Option<ProviderConfig>> {
        Ok(self.metrics_config.clone())
    }
}

/// Read-only view of the dashboard SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Opening dashboard database at {}", path.display());

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI,
        )
        .map_err(|e| StatsError::store(format!("cannot open {}: {}", path.display(), e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StatsError::store("database connection lock poisoned"))?;
        f(&conn).map_err(StatsError::from)
    }
}

/// Config columns hold JSON as TEXT or BLOB depending on the writer
fn config_from_column(value: SqlValue) -> Result<ProviderConfig> {
    match value {
        SqlValue::Null => Ok(ProviderConfig::new()),
        SqlValue::Text(text) => ProviderConfig::from_json_str(&text),
        SqlValue::Blob(bytes) => ProviderConfig::from_json_str(&String::from_utf8_lossy(&bytes)),
        _ => Err(StatsError::store("config column is not JSON text")),
    }
}

fn is_blank(value: &SqlValue) -> bool {
    match value {
        SqlValue::Null => true,
        SqlValue::Text(text) => text.trim().is_empty(),
        SqlValue::Blob(bytes) => bytes.iter().all(u8::is_ascii_whitespace),
        _ => false,
    }
}

impl WidgetStore for SqliteStore {
    fn widget_by_id(&self, id: i64) -> Result<Option<WidgetRecord>> {
        let row = self.with_conn(|conn| {
            conn.query_row(
                "SELECT type, config FROM widgets WHERE id = ?1 AND deleted_at IS NULL",
                params![id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, SqlValue>(1)?)),
            )
            .optional()
        })?;

        match row {
            Some((kind, config)) => Ok(Some(WidgetRecord {
                id,
                kind,
                config: config_from_column(config)?,
            })),
            None => Ok(None),
        }
    }

    fn first_dashboard_metrics_config(&self) -> Result<Option<ProviderConfig>> {
        let column = self.with_conn(|conn| {
            conn.query_row(
                "SELECT glances_config FROM dashboards WHERE deleted_at IS NULL ORDER BY id LIMIT 1",
                [],
                |row| row.get::<_, SqlValue>(0),
            )
            .optional()
        })?;

        match column {
            Some(value) if !is_blank(&value) => config_from_column(value).map(Some),
            _ => Ok(None),
        }
    }
}
