//! Store configuration.

#![allow(clippy::result_large_err)]

use crate::errors::{config_error, io_error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration for opening the store.
///
/// Loaded from TOML; every key is optional.
///
/// ```toml
/// database_path = "data/fitdesk.db"
/// schema_path = "config/schema.sql"
/// blank_picture_path = "assets/avatar.png"
/// id_search_limit = 100000
/// atomic_writes = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// External schema file. The embedded schema is used when unset.
    pub schema_path: Option<PathBuf>,
    /// Stock picture written for users without one. The picture bundled
    /// with the crate is used when unset.
    pub blank_picture_path: Option<PathBuf>,
    /// Upper bound of the gap-filling id search.
    pub id_search_limit: i64,
    /// Wrap multi-table repository operations in a savepoint.
    pub atomic_writes: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(".fitdesk/fitdesk.db"),
            schema_path: None,
            blank_picture_path: None,
            id_search_limit: 100_000,
            atomic_writes: false,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a TOML document.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| config_error(&e.to_string()))?;
        if config.id_search_limit < 1 {
            return Err(config_error("id_search_limit must be at least 1"));
        }
        Ok(config)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| io_error("load_config", e))?;
        Self::from_toml(&text)
    }

    /// Sets the database file.
    #[must_use]
    pub fn database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Sets the external schema file.
    #[must_use]
    pub fn schema_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(path.into());
        self
    }

    /// Sets the stock picture file.
    #[must_use]
    pub fn blank_picture_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blank_picture_path = Some(path.into());
        self
    }

    /// Sets the id search bound.
    #[must_use]
    pub fn id_search_limit(mut self, limit: i64) -> Self {
        self.id_search_limit = limit.max(1);
        self
    }

    /// Enables or disables savepoint-wrapped repository writes.
    #[must_use]
    pub fn atomic_writes(mut self, enabled: bool) -> Self {
        self.atomic_writes = enabled;
        self
    }
}
