use parking_lot::{Mutex, RwLock};
use rusqlite::{Connection, OpenFlags};
use std::sync::{Arc, Weak};
use tracing::{debug, error, info, instrument, warn};
use wellstat_core::{
    error::{Result, StoreError},
    CloseOutcome, CloseScheduler, EventRecord, LevelResolver, StoreConfig, TimeBoundary,
    TransactionWindow, WellboreCounter, WindowCloser,
};

use crate::counters::{self, CounterCache};
use crate::errors::open_error;
use crate::event_log::{self, NewEvent};
use crate::query::RangeQuery;
use crate::schema;
use crate::txn::TransactionCoordinator;

/// SQLite-backed telemetry store
///
/// Holds one connection, the counter cache and the transaction window
/// behind a single read/write lock. Writes are batched into transaction
/// windows that a `CloseScheduler` closes after `close_delay_ms`.
///
/// A store that failed to open or initialize its schema stays unavailable
/// for its whole lifetime; every write and query then fails with
/// `StoreError::Unavailable`.
pub struct PersistenceManager {
    shared: Arc<Shared>,
}

struct Shared {
    state: Option<RwLock<StoreState>>,
    scheduler: Arc<dyn CloseScheduler>,
    levels: Arc<dyn LevelResolver>,
    config: StoreConfig,
}

struct StoreState {
    // rusqlite connections are not Sync; readers take this mutex, writers
    // reach it through the exclusive guard with `get_mut`.
    conn: Mutex<Connection>,
    counters: CounterCache,
    window: TransactionCoordinator,
}

/// Handle that closes the window of a still-living store.
///
/// A scheduled handle is bound to the window it was scheduled for and does
/// nothing once that window has been closed some other way.
struct WindowCloseHandle {
    shared: Weak<Shared>,
    generation: Option<u64>,
}

impl WindowCloser for WindowCloseHandle {
    fn close(&self) -> Result<CloseOutcome> {
        match self.shared.upgrade() {
            Some(shared) => shared.close_window(self.generation),
            None => Ok(CloseOutcome::Idle),
        }
    }
}

impl PersistenceManager {
    /// Open the store, degrading to an unavailable handle on failure.
    pub fn open(
        config: StoreConfig,
        scheduler: Arc<dyn CloseScheduler>,
        levels: Arc<dyn LevelResolver>,
    ) -> Self {
        let state = match Self::open_state(&config) {
            Ok(state) => Some(state),
            Err(e) => {
                error!(path = %config.path.display(), error = %e, "Telemetry store unavailable");
                None
            }
        };
        Self::from_parts(state, config, scheduler, levels)
    }

    /// Open the store, returning the open or schema failure instead of an
    /// unavailable handle.
    pub fn try_open(
        config: StoreConfig,
        scheduler: Arc<dyn CloseScheduler>,
        levels: Arc<dyn LevelResolver>,
    ) -> Result<Self> {
        let state = Self::open_state(&config)?;
        Ok(Self::from_parts(Some(state), config, scheduler, levels))
    }

    fn from_parts(
        state: Option<StoreState>,
        config: StoreConfig,
        scheduler: Arc<dyn CloseScheduler>,
        levels: Arc<dyn LevelResolver>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: state.map(RwLock::new),
                scheduler,
                levels,
                config,
            }),
        }
    }

    #[instrument(skip(config), fields(path = %config.path.display()))]
    fn open_state(config: &StoreConfig) -> Result<StoreState> {
        // Create parent directory if needed
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            &config.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(open_error)?;

        Self::configure_connection(&conn, config)?;

        // The connection is dropped (closed) if this fails.
        schema::create_tables(&conn)?;

        let mut counters = CounterCache::new();
        let mut accumulator = Vec::new();
        match schema::load_counters(&conn, &mut accumulator) {
            Ok(loaded) => {
                counters.load(accumulator);
                info!(wellbores = loaded, "Loaded wellbore statistics");
            }
            Err(e) => warn!(error = %e, "Failed to load wellbore statistics"),
        }

        info!("Opened telemetry store");

        Ok(StoreState {
            conn: Mutex::new(conn),
            counters,
            window: TransactionCoordinator::new(),
        })
    }

    /// Configure SQLite connection
    fn configure_connection(conn: &Connection, cfg: &StoreConfig) -> Result<()> {
        if cfg.wal_mode {
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .map_err(open_error)?;
        }

        conn.pragma_update(None, "synchronous", cfg.synchronous.as_pragma())
            .map_err(open_error)?;

        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(open_error)?;

        conn.pragma_update(None, "cache_size", cfg.cache_size)
            .map_err(open_error)?;

        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.shared.state.is_some()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.shared.config
    }

    /// Snapshot of the transaction window (idle for an unavailable store).
    pub fn window_state(&self) -> TransactionWindow {
        self.shared
            .state
            .as_ref()
            .map(|lock| lock.read().window.window())
            .unwrap_or_default()
    }

    /// Add to a wellbore's success/failure counters.
    ///
    /// The cache takes the new totals before the UPSERT runs, so a failed
    /// statement still leaves them visible to `get_data_statistics`.
    /// Returns the new totals.
    pub fn update_data_statistics(
        &self,
        wellbore_id: &str,
        succ_inc: u64,
        fail_inc: u64,
    ) -> Result<(u64, u64)> {
        debug_assert!(!wellbore_id.is_empty(), "wellbore id must not be empty");
        let lock = self.shared.state()?;

        let mut guard = lock.write();
        let state = &mut *guard;
        let totals = state.counters.apply(wellbore_id, succ_inc, fail_inc);
        let conn = state.conn.get_mut();
        state.window.ensure_open(conn, |generation| self.shared.schedule_close(generation))?;
        let result = counters::upsert(conn, wellbore_id, totals);
        state.window.track(result, "counter")?;
        Ok(totals)
    }

    /// Append one event to the log.
    ///
    /// With `auxiliary` the payload is stored as a BLOB; without it the
    /// column is left NULL. Appending an existing
    /// `(wellbore, code, timestamp)` key fails and rolls back the window.
    pub fn update_event_record(
        &self,
        wellbore_id: &str,
        description_code: u32,
        time_sec: u32,
        time_millis: u32,
        auxiliary: Option<&[u8]>,
    ) -> Result<()> {
        debug_assert!(!wellbore_id.is_empty(), "wellbore id must not be empty");
        let lock = self.shared.state()?;

        let level = self.shared.levels.level(description_code);
        let event = NewEvent {
            wellbore_id,
            level: &level,
            description_code,
            timestamp_millis: EventRecord::timestamp_from_parts(time_sec, time_millis),
            auxiliary,
        };

        let mut guard = lock.write();
        let state = &mut *guard;
        let conn = state.conn.get_mut();
        state.window.ensure_open(conn, |generation| self.shared.schedule_close(generation))?;
        let result = event_log::insert(conn, &event);
        state.window.track(result, "event")?;
        Ok(())
    }

    /// Cached counters for a wellbore. Never touches SQLite.
    pub fn get_data_statistics(&self, wellbore_id: &str) -> Option<(u64, u64)> {
        let lock = self.shared.state.as_ref()?;
        let guard = lock.read();
        guard.counters.get(wellbore_id)
    }

    /// All cached counters, ordered by wellbore id.
    pub fn data_statistics(&self) -> Vec<WellboreCounter> {
        self.shared
            .state
            .as_ref()
            .map(|lock| lock.read().counters.snapshot())
            .unwrap_or_default()
    }

    /// Events for a wellbore between two boundaries, most recent first.
    ///
    /// Boundaries may be given in either order. `max_return == 0` returns
    /// every match.
    pub fn get_event_record(
        &self,
        wellbore_id: &str,
        begin: TimeBoundary,
        end: TimeBoundary,
        max_return: u32,
    ) -> Result<Vec<EventRecord>> {
        let lock = self.shared.state()?;
        let query = RangeQuery::build(wellbore_id, begin, end, max_return);

        let guard = lock.read();
        let conn = guard.conn.lock();
        query.run(&conn)
    }

    /// A closer bound to this store, for driving a close outside the
    /// configured scheduler (shutdown paths, external timer loops). It
    /// closes whichever window is open when it runs.
    pub fn window_closer(&self) -> Arc<dyn WindowCloser> {
        self.shared.closer(None)
    }
}

impl Shared {
    fn state(&self) -> Result<&RwLock<StoreState>> {
        self.state.as_ref().ok_or(StoreError::Unavailable)
    }

    fn closer(self: &Arc<Self>, generation: Option<u64>) -> Arc<dyn WindowCloser> {
        Arc::new(WindowCloseHandle {
            shared: Arc::downgrade(self),
            generation,
        })
    }

    fn schedule_close(self: &Arc<Self>, generation: u64) {
        self.scheduler
            .schedule_close(self.config.close_delay(), self.closer(Some(generation)));
    }

    /// Close the open window. With `generation`, only that window is
    /// closed; a later one is left for its own scheduled close.
    fn close_window(self: &Arc<Self>, generation: Option<u64>) -> Result<CloseOutcome> {
        let lock = self.state()?;
        let mut guard = lock.write();
        let state = &mut *guard;

        let current = state.window.generation();
        if generation.is_some_and(|g| g != current) {
            debug!(scheduled = ?generation, current, "Skipping close of an already closed window");
            return Ok(CloseOutcome::Idle);
        }

        let result = state.window.close(state.conn.get_mut());
        if result.is_err() && state.window.window().is_open() {
            if self.config.retry_failed_close {
                warn!(
                    delay_ms = self.config.close_delay_ms,
                    "Rescheduling transaction window close"
                );
                self.schedule_close(current);
            } else {
                error!("Transaction window left open after failed close");
            }
        }
        result
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(lock) = self.state.as_mut() {
            if lock.get_mut().window.window().is_open() {
                warn!("Closing telemetry store with an open transaction window; pending writes are discarded");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wellstat_core::DefaultLevels;
    use wellstat_scheduler::ManualScheduler;

    fn open(dir: &TempDir, retry: bool) -> (PersistenceManager, Arc<ManualScheduler>) {
        let scheduler = Arc::new(ManualScheduler::new());
        let config = StoreConfig::new(dir.path().join("stats.db")).with_retry_failed_close(retry);
        let store = PersistenceManager::try_open(config, scheduler.clone(), Arc::new(DefaultLevels))
            .unwrap();
        (store, scheduler)
    }

    fn exec(store: &PersistenceManager, sql: &str) {
        let lock = store.shared.state.as_ref().unwrap();
        let mut guard = lock.write();
        guard.conn.get_mut().execute_batch(sql).unwrap();
    }

    #[test]
    fn test_failed_commit_is_rescheduled() {
        let dir = tempfile::tempdir().unwrap();
        let (store, scheduler) = open(&dir, true);
        exec(
            &store,
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (pid INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED);",
        );

        store.update_data_statistics("W1", 1, 0).unwrap();
        exec(&store, "INSERT INTO child VALUES (42)");
        assert_eq!(scheduler.pending(), 1);

        let results = scheduler.fire_all();
        assert!(matches!(results[0], Err(StoreError::Transaction { .. })));
        assert!(store.window_state().is_open());
        assert_eq!(scheduler.pending(), 1, "close should be rescheduled");

        exec(&store, "INSERT INTO parent VALUES (42)");
        let results = scheduler.fire_all();
        assert_eq!(results[0].as_ref().unwrap(), &CloseOutcome::Committed);
        assert!(!store.window_state().is_open());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_failed_commit_without_retry_stays_open() {
        let dir = tempfile::tempdir().unwrap();
        let (store, scheduler) = open(&dir, false);
        exec(
            &store,
            "CREATE TABLE parent (id INTEGER PRIMARY KEY);
             CREATE TABLE child (pid INTEGER REFERENCES parent(id) DEFERRABLE INITIALLY DEFERRED);",
        );

        store.update_data_statistics("W1", 1, 0).unwrap();
        exec(&store, "INSERT INTO child VALUES (7)");

        let results = scheduler.fire_all();
        assert!(results[0].is_err());
        assert!(store.window_state().is_open());
        assert_eq!(scheduler.pending(), 0);

        // Further writes join the stuck window without scheduling anything.
        store.update_data_statistics("W1", 1, 0).unwrap();
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_flush_leaves_next_window_to_its_own_close() {
        let dir = tempfile::tempdir().unwrap();
        let (store, scheduler) = open(&dir, true);

        store.update_data_statistics("W1", 1, 0).unwrap();
        assert_eq!(
            store.window_closer().close().unwrap(),
            CloseOutcome::Committed
        );
        store.update_data_statistics("W1", 1, 0).unwrap();
        assert_eq!(scheduler.pending(), 2);

        // The close scheduled for the flushed window must not end the new one.
        let results = scheduler.fire_all();
        assert_eq!(results[0].as_ref().unwrap(), &CloseOutcome::Idle);
        assert_eq!(results[1].as_ref().unwrap(), &CloseOutcome::Committed);
        assert!(!store.window_state().is_open());
    }

    #[test]
    fn test_closer_outliving_store_is_idle() {
        let dir = tempfile::tempdir().unwrap();
        let (store, scheduler) = open(&dir, true);
        store.update_data_statistics("W1", 1, 0).unwrap();
        drop(store);

        let results = scheduler.fire_all();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap(), &CloseOutcome::Idle);
    }
}
