pub mod events;
pub mod record;
pub mod stats;

use anyhow::{Context, Result};
use std::path::PathBuf;
use wellstat::prelude::*;

/// Build the store configuration from `--config` and `--db-path`.
pub fn load_config(db_path: Option<PathBuf>, config: Option<PathBuf>) -> Result<StoreConfig> {
    let mut store_config = match config {
        Some(path) => StoreConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(db_path) = db_path {
        store_config.path = db_path;
    }
    Ok(store_config)
}

/// Open the database, failing when the store is unavailable.
pub fn open(config: StoreConfig) -> Result<TelemetryDb> {
    let path = config.path.clone();
    TelemetryDb::open_with_config(config)
        .with_context(|| format!("Failed to open database {}", path.display()))
}
