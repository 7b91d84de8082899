//! Alert shape shared by every adapter that reports problems.
//!
//! Alerts keep insertion order and are never deduplicated.

use serde::{Deserialize, Serialize};

/// An individual alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub message: String,
    pub level: AlertLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
}

impl Alert {
    pub fn new<S: Into<String>>(level: AlertLevel, message: S) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    pub fn info<S: Into<String>>(message: S) -> Self {
        Self::new(AlertLevel::Info, message)
    }

    pub fn warning<S: Into<String>>(message: S) -> Self {
        Self::new(AlertLevel::Warning, message)
    }

    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::new(AlertLevel::Error, message)
    }
}
