use crate::error::Result;
use crate::types::CloseOutcome;
use std::sync::Arc;
use std::time::Duration;

/// The one operation a scheduler may invoke on a store: close the
/// currently open transaction window.
///
/// Implementations must be safe to call from any thread and must tolerate
/// being called when no window is open (returning `CloseOutcome::Idle`).
pub trait WindowCloser: Send + Sync {
    fn close(&self) -> Result<CloseOutcome>;
}

/// Deferred one-shot execution of a window close.
///
/// The store calls `schedule_close` exactly once per opened window. The
/// scheduler must eventually call `closer.close()` once, no earlier than
/// `delay` from now, and must not block the caller.
pub trait CloseScheduler: Send + Sync {
    fn schedule_close(&self, delay: Duration, closer: Arc<dyn WindowCloser>);
}

impl<S: CloseScheduler + ?Sized> CloseScheduler for Arc<S> {
    fn schedule_close(&self, delay: Duration, closer: Arc<dyn WindowCloser>) {
        (**self).schedule_close(delay, closer)
    }
}
