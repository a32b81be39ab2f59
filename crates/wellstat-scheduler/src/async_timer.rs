//! Tokio-driven scheduler.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::error;
use wellstat_core::{CloseScheduler, WindowCloser};

/// Schedules each close as a task on a tokio runtime.
///
/// The close itself takes the store's write lock and runs SQL, so it is
/// moved onto the blocking pool.
#[derive(Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime of the calling task.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl CloseScheduler for TokioScheduler {
    fn schedule_close(&self, delay: Duration, closer: Arc<dyn WindowCloser>) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let joined = tokio::task::spawn_blocking(move || crate::run_close(closer.as_ref())).await;
            if let Err(e) = joined {
                error!("Window close task failed: {}", e);
            }
        });
    }
}
