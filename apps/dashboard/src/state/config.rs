//! # Configuration State
//!
//! Stores dashboard configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`TALLY_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tally_core::view::{DEFAULT_CHART_LABEL, DEFAULT_EMPTY_CHART_MESSAGE};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Could not prepare app data directory: {0}")]
    DataDir(String),
}

/// Dashboard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// SQLite file. `None` means the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Connection pool size.
    /// Default: 5
    pub max_connections: u32,

    /// Dataset label of the top items chart.
    pub chart_label: String,

    /// Chart title shown when nothing has been sold.
    pub empty_chart_message: String,
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            db_path: None,
            max_connections: 5,
            chart_label: DEFAULT_CHART_LABEL.to_string(),
            empty_chart_message: DEFAULT_EMPTY_CHART_MESSAGE.to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `TALLY_DB_PATH`: SQLite file path
    /// - `TALLY_MAX_CONNECTIONS`: pool size (positive integer)
    /// - `TALLY_CHART_LABEL`: chart dataset label
    /// - `TALLY_EMPTY_CHART_MESSAGE`: empty chart title
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("TALLY_DB_PATH").filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(PathBuf::from(path));
        }

        if let Some(raw) = lookup("TALLY_MAX_CONNECTIONS") {
            let invalid = |reason: &str| ConfigError::InvalidValue {
                key: "TALLY_MAX_CONNECTIONS".to_string(),
                value: raw.clone(),
                reason: reason.to_string(),
            };
            let max: u32 = raw
                .trim()
                .parse()
                .map_err(|_| invalid("expected a positive integer"))?;
            if max == 0 {
                return Err(invalid("must be at least 1"));
            }
            config.max_connections = max;
        }

        if let Some(label) = lookup("TALLY_CHART_LABEL") {
            config.chart_label = label;
        }

        if let Some(message) = lookup("TALLY_EMPTY_CHART_MESSAGE") {
            config.empty_chart_message = message;
        }

        Ok(config)
    }
}
