use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wellstat_core::{CloseOutcome, CloseScheduler, Result, StoreError, WindowCloser};
use wellstat_scheduler::{ManualScheduler, SchedulerConfig, ThreadScheduler, TokioScheduler};

// Closer that records when it ran
#[derive(Default)]
struct RecordingCloser {
    calls: AtomicUsize,
    fired_at: Mutex<Vec<Instant>>,
}

impl WindowCloser for RecordingCloser {
    fn close(&self) -> Result<CloseOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.fired_at.lock().push(Instant::now());
        Ok(CloseOutcome::Committed)
    }
}

// Closer that fails the first time and reschedules itself
struct FlakyCloser {
    scheduler: Arc<ManualScheduler>,
    attempts: AtomicUsize,
    me: Mutex<Option<Arc<dyn WindowCloser>>>,
}

impl WindowCloser for FlakyCloser {
    fn close(&self) -> Result<CloseOutcome> {
        if self.attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Some(me) = self.me.lock().clone() {
                self.scheduler.schedule_close(Duration::from_millis(5), me);
            }
            return Err(StoreError::Transaction {
                code: 5,
                message: "database is locked".into(),
            });
        }
        Ok(CloseOutcome::Committed)
    }
}

fn wait_for(counter: &AtomicUsize, expected: usize, timeout: Duration) {
    let start = Instant::now();
    while counter.load(Ordering::SeqCst) < expected && start.elapsed() < timeout {
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_manual_scheduler_fires_in_order() {
    let scheduler = ManualScheduler::new();
    let a = Arc::new(RecordingCloser::default());
    let b = Arc::new(RecordingCloser::default());

    scheduler.schedule_close(Duration::from_millis(500), a.clone());
    scheduler.schedule_close(Duration::from_millis(20), b.clone());
    assert_eq!(scheduler.pending(), 2);
    assert_eq!(
        scheduler.pending_delays(),
        vec![Duration::from_millis(500), Duration::from_millis(20)]
    );

    let results = scheduler.fire_all();
    assert_eq!(results.len(), 2);
    assert!(a.fired_at.lock()[0] <= b.fired_at.lock()[0]);
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.scheduled_total(), 2);
}

#[test]
fn test_manual_scheduler_keeps_retries_for_next_round() {
    let scheduler = Arc::new(ManualScheduler::new());
    let flaky = Arc::new(FlakyCloser {
        scheduler: scheduler.clone(),
        attempts: AtomicUsize::new(0),
        me: Mutex::new(None),
    });
    *flaky.me.lock() = Some(flaky.clone());

    scheduler.schedule_close(Duration::from_millis(5), flaky.clone());
    let first = scheduler.fire_all();
    assert!(first[0].is_err());
    assert_eq!(scheduler.pending(), 1);

    let second = scheduler.fire_all();
    assert_eq!(second[0].as_ref().unwrap(), &CloseOutcome::Committed);
    assert_eq!(scheduler.pending(), 0);

    // Break the self-reference cycle.
    flaky.me.lock().take();
}

#[test]
fn test_thread_scheduler_respects_delay() {
    let scheduler = ThreadScheduler::with_config(SchedulerConfig::new().with_thread_name("test-close"))
        .unwrap();
    let closer = Arc::new(RecordingCloser::default());

    let scheduled_at = Instant::now();
    scheduler.schedule_close(Duration::from_millis(50), closer.clone());
    wait_for(&closer.calls, 1, Duration::from_secs(5));

    assert_eq!(closer.calls.load(Ordering::SeqCst), 1);
    let fired = closer.fired_at.lock()[0];
    assert!(fired.duration_since(scheduled_at) >= Duration::from_millis(50));
}

#[test]
fn test_thread_scheduler_orders_by_deadline() {
    let scheduler = ThreadScheduler::new().unwrap();
    let late = Arc::new(RecordingCloser::default());
    let early = Arc::new(RecordingCloser::default());

    scheduler.schedule_close(Duration::from_millis(120), late.clone());
    scheduler.schedule_close(Duration::from_millis(10), early.clone());
    wait_for(&late.calls, 1, Duration::from_secs(5));

    assert_eq!(early.calls.load(Ordering::SeqCst), 1);
    assert!(early.fired_at.lock()[0] < late.fired_at.lock()[0]);
}

#[test]
fn test_thread_scheduler_drop_runs_pending() {
    let closer = Arc::new(RecordingCloser::default());
    let start = Instant::now();
    {
        let scheduler = ThreadScheduler::new().unwrap();
        scheduler.schedule_close(Duration::from_secs(60), closer.clone());
    }
    assert_eq!(closer.calls.load(Ordering::SeqCst), 1);
    assert!(start.elapsed() < Duration::from_secs(30));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_scheduler_runs_close() {
    let scheduler = TokioScheduler::current();
    let closer = Arc::new(RecordingCloser::default());

    scheduler.schedule_close(Duration::from_millis(20), closer.clone());
    assert_eq!(closer.calls.load(Ordering::SeqCst), 0);

    let start = Instant::now();
    while closer.calls.load(Ordering::SeqCst) == 0 && start.elapsed() < Duration::from_secs(5) {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(closer.calls.load(Ordering::SeqCst), 1);
}
