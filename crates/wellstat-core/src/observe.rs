//! Optional metrics instrumentation for wellstat.
//!
//! When the `observe` feature is enabled, window transitions and statement
//! failures emit counters and histograms via the [`metrics`] crate. A
//! downstream application must install a metrics recorder to collect them.
//!
//! When the feature is **not** enabled every function in this module is a
//! zero-cost no-op.

use crate::types::CloseOutcome;

/// Record a transaction window being opened.
///
/// - `wellstat.window.opened_total` – counter
#[inline]
pub fn record_window_open() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("wellstat.window.opened_total").increment(1);
    }
}

/// Record a completed window close (commit or rollback).
///
/// - `wellstat.window.commits_total` / `wellstat.window.rollbacks_total` – counters
/// - `wellstat.window.open_duration_seconds` – histogram of how long the window stayed open
#[inline]
pub fn record_window_close(outcome: CloseOutcome, open_for: std::time::Duration) {
    #[cfg(feature = "observe")]
    {
        match outcome {
            CloseOutcome::Committed => {
                metrics::counter!("wellstat.window.commits_total").increment(1)
            }
            CloseOutcome::RolledBack => {
                metrics::counter!("wellstat.window.rollbacks_total").increment(1)
            }
            CloseOutcome::Idle => return,
        }
        metrics::histogram!("wellstat.window.open_duration_seconds")
            .record(open_for.as_secs_f64());
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = (outcome, open_for);
    }
}

/// Record a COMMIT/ROLLBACK that failed.
///
/// - `wellstat.window.close_failures_total` – counter
#[inline]
pub fn record_close_failure() {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("wellstat.window.close_failures_total").increment(1);
    }
}

/// Record a failed write statement.
///
/// - `wellstat.statement.failures_total` – counter with `kind` label (`counter` / `event`)
#[inline]
pub fn record_statement_failure(kind: &'static str) {
    #[cfg(feature = "observe")]
    {
        metrics::counter!("wellstat.statement.failures_total", "kind" => kind).increment(1);
    }
    #[cfg(not(feature = "observe"))]
    {
        let _ = kind;
    }
}
