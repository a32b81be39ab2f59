//! Scheduler driven by explicit calls.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wellstat_core::{error::Result, CloseOutcome, CloseScheduler, WindowCloser};

struct PendingClose {
    delay: Duration,
    closer: Arc<dyn WindowCloser>,
}

/// Holds scheduled closes until `fire_all` is called.
///
/// The requested delay is recorded but not waited for. Useful for tests and
/// for hosts that already run their own timer loop.
#[derive(Default)]
pub struct ManualScheduler {
    pending: Mutex<Vec<PendingClose>>,
    scheduled: AtomicUsize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of closes waiting to be fired.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Number of closes ever scheduled.
    pub fn scheduled_total(&self) -> usize {
        self.scheduled.load(Ordering::SeqCst)
    }

    /// Delays requested by the waiting closes, in scheduling order.
    pub fn pending_delays(&self) -> Vec<Duration> {
        self.pending.lock().iter().map(|p| p.delay).collect()
    }

    /// Run every waiting close, in scheduling order.
    ///
    /// Closes scheduled while firing (retries) are kept for the next call.
    pub fn fire_all(&self) -> Vec<Result<CloseOutcome>> {
        let due = std::mem::take(&mut *self.pending.lock());
        due.into_iter().map(|p| p.closer.close()).collect()
    }
}

impl CloseScheduler for ManualScheduler {
    fn schedule_close(&self, delay: Duration, closer: Arc<dyn WindowCloser>) {
        self.scheduled.fetch_add(1, Ordering::SeqCst);
        self.pending.lock().push(PendingClose { delay, closer });
    }
}
