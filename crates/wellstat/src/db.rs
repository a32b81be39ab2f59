//! Unified telemetry database interface
//!
//! Bundles the SQLite store with the timer thread that closes its
//! transaction windows.

use crate::{
    CloseOutcome, DefaultLevels, LevelResolver, PersistenceManager, Result, StoreConfig,
    ThreadScheduler, WindowCloser,
};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Telemetry database with its own close scheduler
///
/// Dropping a `TelemetryDb` closes any open window first, so writes made
/// through it are not lost on shutdown.
pub struct TelemetryDb {
    store: PersistenceManager,
    scheduler: Arc<ThreadScheduler>,
}

impl TelemetryDb {
    /// Open the database file at `path` with default settings and the
    /// range-based `DefaultLevels`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_config(StoreConfig::new(path.as_ref()))
    }

    /// Open with a custom store configuration
    pub fn open_with_config(config: StoreConfig) -> Result<Self> {
        Self::open_with_levels(config, Arc::new(DefaultLevels))
    }

    /// Open with a custom configuration and level resolver
    ///
    /// Unlike `PersistenceManager::open`, a store that cannot be opened or
    /// initialized is reported as an error here.
    pub fn open_with_levels(config: StoreConfig, levels: Arc<dyn LevelResolver>) -> Result<Self> {
        let scheduler = Arc::new(ThreadScheduler::new()?);
        let store = PersistenceManager::try_open(config, scheduler.clone(), levels)?;

        Ok(Self { store, scheduler })
    }

    /// Get reference to the underlying store
    pub fn store(&self) -> &PersistenceManager {
        &self.store
    }

    /// Get reference to the close scheduler
    pub fn scheduler(&self) -> &Arc<ThreadScheduler> {
        &self.scheduler
    }

    pub fn path(&self) -> &Path {
        &self.store.config().path
    }

    /// Close the open window now instead of waiting for the scheduled close.
    ///
    /// The close scheduled for the flushed window still fires later but
    /// does nothing, even if another window has been opened by then.
    pub fn flush(&self) -> Result<CloseOutcome> {
        self.store.window_closer().close()
    }

    /// Block until no window is open, or `timeout` elapses.
    ///
    /// Returns whether the store went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        loop {
            if !self.store.window_state().is_open() {
                return true;
            }
            if start.elapsed() >= timeout {
                return false;
            }
            std::thread::sleep(IDLE_POLL_INTERVAL);
        }
    }
}

impl Drop for TelemetryDb {
    fn drop(&mut self) {
        if !self.store.window_state().is_open() {
            return;
        }
        match self.flush() {
            Ok(outcome) => tracing::info!(?outcome, "Flushed transaction window on shutdown"),
            Err(e) => tracing::error!("Failed to flush transaction window on shutdown: {}", e),
        }
    }
}
