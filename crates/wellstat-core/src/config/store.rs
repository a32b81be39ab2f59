use crate::error::{Result, StoreError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the telemetry store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file
    /// Default: ./Persistence/TranServer.db
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Delay between opening a transaction window and closing it
    /// Default: 500
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,

    /// SQLite synchronous mode
    #[serde(default)]
    pub synchronous: SynchronousMode,

    /// Enable WAL mode
    /// Default: false (the store uses a single connection)
    #[serde(default)]
    pub wal_mode: bool,

    /// SQLite cache size (in pages, negative = KB)
    /// Default: -2000 (2MB)
    #[serde(default = "default_cache_size")]
    pub cache_size: i32,

    /// Reschedule a close whose COMMIT/ROLLBACK failed.
    ///
    /// With this off, a window whose close failed stays open until the
    /// store is dropped.
    #[serde(default = "default_retry_failed_close")]
    pub retry_failed_close: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SynchronousMode {
    /// Full fsync (safest, slowest)
    Full,
    /// fsync at critical moments (good balance)
    #[default]
    Normal,
    /// No fsync (fastest, least safe)
    Off,
}

impl SynchronousMode {
    pub fn as_pragma(self) -> &'static str {
        match self {
            SynchronousMode::Full => "FULL",
            SynchronousMode::Normal => "NORMAL",
            SynchronousMode::Off => "OFF",
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./Persistence/TranServer.db")
}

fn default_close_delay_ms() -> u64 {
    500
}

fn default_cache_size() -> i32 {
    -2000
}

fn default_retry_failed_close() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(default_path())
    }
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            close_delay_ms: default_close_delay_ms(),
            synchronous: SynchronousMode::default(),
            wal_mode: false,
            cache_size: default_cache_size(),
            retry_failed_close: default_retry_failed_close(),
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            StoreError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }

    pub fn with_close_delay_ms(mut self, close_delay_ms: u64) -> Self {
        self.close_delay_ms = close_delay_ms;
        self
    }

    pub fn with_synchronous(mut self, synchronous: SynchronousMode) -> Self {
        self.synchronous = synchronous;
        self
    }

    pub fn with_wal_mode(mut self, wal_mode: bool) -> Self {
        self.wal_mode = wal_mode;
        self
    }

    pub fn with_retry_failed_close(mut self, retry: bool) -> Self {
        self.retry_failed_close = retry;
        self
    }
}
