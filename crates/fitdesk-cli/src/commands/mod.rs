pub mod prefs;
pub mod profile;
pub mod schema;
pub mod user;

use clap::Args;
use fitdesk_store::{PersistenceEngine, StoreConfig};
use std::path::PathBuf;

/// Store location options shared by every subcommand
#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file; overrides `database_path` from the configuration
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

impl StoreArgs {
    pub fn config(&self) -> Result<StoreConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::load(path)?,
            None => StoreConfig::default(),
        };
        if let Some(db) = &self.db {
            config = config.database_path(db);
        }
        Ok(config)
    }

    /// Open the configured database without touching its schema
    pub fn open(&self) -> Result<(PersistenceEngine, StoreConfig), Box<dyn std::error::Error>> {
        let config = self.config()?;
        let engine = PersistenceEngine::open(&config)?;
        tracing::debug!(db = %config.database_path.display(), "store opened");
        Ok((engine, config))
    }
}

/// Cell value from a command-line word: integer, then real, then text
pub fn parse_cell(raw: &str) -> fitdesk_core::Value {
    if let Ok(i) = raw.parse::<i64>() {
        return i.into();
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() => fitdesk_core::Value::Real(f),
        _ => raw.into(),
    }
}
