//! wellstat Scheduler
//!
//! Implementations of `CloseScheduler`, the deferred one-shot timer that
//! closes a store's transaction window.
//!
//! - [`ThreadScheduler`]: one background timer thread, no runtime needed
//! - [`TokioScheduler`]: a task per close on an existing tokio runtime
//! - [`ManualScheduler`]: closes run only when the host calls `fire_all`
//!
//! # Example
//!
//! ```ignore
//! use wellstat_scheduler::ThreadScheduler;
//! use std::sync::Arc;
//!
//! let scheduler = Arc::new(ThreadScheduler::new()?);
//! let store = PersistenceManager::open(config, scheduler, Arc::new(DefaultLevels));
//! ```

pub mod async_timer;
pub mod config;
pub mod manual;
pub mod thread;

pub use async_timer::TokioScheduler;
pub use config::SchedulerConfig;
pub use manual::ManualScheduler;
pub use thread::ThreadScheduler;

use tracing::{debug, warn};
use wellstat_core::{CloseOutcome, WindowCloser};

/// Run a close and log its outcome. Failures are the store's to retry.
pub(crate) fn run_close(closer: &dyn WindowCloser) -> Option<CloseOutcome> {
    match closer.close() {
        Ok(outcome) => {
            debug!(?outcome, "Scheduled window close finished");
            Some(outcome)
        }
        Err(e) => {
            warn!("Scheduled window close failed: {}", e);
            None
        }
    }
}
