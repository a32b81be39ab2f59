use rusqlite::Connection;
use std::time::Instant;
use tracing::{debug, warn};
use wellstat_core::{
    error::Result, observe, CloseOutcome, TransactionWindow, WindowState,
};

use crate::errors::{statement_error, transaction_error};

/// Batches write statements into one SQLite transaction.
///
/// The first write after an idle period begins a transaction and asks the
/// caller to schedule exactly one deferred close; later writes run inside
/// the open window. The close commits, or rolls back if any write in the
/// window failed. All methods must be called with the store's write lock
/// held.
#[derive(Debug, Default)]
pub struct TransactionCoordinator {
    state: WindowState,
    has_error: bool,
    opened_at: Option<Instant>,
    generation: u64,
}

impl TransactionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self) -> TransactionWindow {
        TransactionWindow {
            state: self.state,
            has_error: self.has_error,
        }
    }

    /// Number of windows opened so far; identifies the current window.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a transaction unless one is already open.
    ///
    /// `schedule_close` runs only when a new window was opened, and gets
    /// that window's generation. If BEGIN fails the window stays idle and
    /// the error is returned.
    pub fn ensure_open<F: FnOnce(u64)>(&mut self, conn: &Connection, schedule_close: F) -> Result<()> {
        if self.state == WindowState::Open {
            return Ok(());
        }

        conn.execute_batch("BEGIN TRANSACTION")
            .map_err(transaction_error)?;

        self.state = WindowState::Open;
        self.has_error = false;
        self.opened_at = Some(Instant::now());
        self.generation += 1;
        observe::record_window_open();
        debug!(generation = self.generation, "Transaction window opened");

        schedule_close(self.generation);
        Ok(())
    }

    /// Mark the open window as failed so its close rolls back.
    pub fn record_failure(&mut self) {
        if self.state == WindowState::Open {
            self.has_error = true;
        }
    }

    /// Convert a write statement's result, flagging the window on failure.
    pub fn track<T>(&mut self, result: rusqlite::Result<T>, kind: &'static str) -> Result<T> {
        result.map_err(|e| {
            self.record_failure();
            observe::record_statement_failure(kind);
            let err = statement_error(e);
            debug!(kind, error = %err, "Write statement failed");
            err
        })
    }

    /// Commit or roll back the open window.
    ///
    /// A failed COMMIT/ROLLBACK leaves the window open, unless SQLite has
    /// already ended the transaction on its own.
    pub fn close(&mut self, conn: &Connection) -> Result<CloseOutcome> {
        if self.state == WindowState::Idle {
            return Ok(CloseOutcome::Idle);
        }

        let (sql, outcome) = if self.has_error {
            ("ROLLBACK TRANSACTION", CloseOutcome::RolledBack)
        } else {
            ("COMMIT TRANSACTION", CloseOutcome::Committed)
        };

        match conn.execute_batch(sql) {
            Ok(()) => {
                let open_for = self.reset();
                observe::record_window_close(outcome, open_for);
                debug!(?outcome, ?open_for, "Transaction window closed");
                Ok(outcome)
            }
            Err(e) => {
                observe::record_close_failure();
                let err = transaction_error(e);
                if conn.is_autocommit() {
                    warn!(error = %err, "Transaction ended by the engine; window reset");
                    self.reset();
                } else {
                    warn!(error = %err, "Failed to close transaction window");
                }
                Err(err)
            }
        }
    }

    fn reset(&mut self) -> std::time::Duration {
        self.state = WindowState::Idle;
        self.has_error = false;
        self.opened_at
            .take()
            .map(|t| t.elapsed())
            .unwrap_or_default()
    }
}
