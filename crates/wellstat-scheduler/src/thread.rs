//! Single timer thread firing closes at their deadlines.

use crate::config::SchedulerConfig;
use parking_lot::Mutex;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use wellstat_core::{CloseScheduler, WindowCloser};

struct Job {
    deadline: Instant,
    seq: u64,
    closer: Arc<dyn WindowCloser>,
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for Job {}

impl PartialOrd for Job {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Job {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

struct Inner {
    sender: Option<Sender<Job>>,
    next_seq: u64,
}

/// Runs scheduled closes on one background thread.
///
/// Dropping the scheduler stops accepting new closes; closes already
/// scheduled run right away, without waiting out their delay, before the
/// drop returns.
pub struct ThreadScheduler {
    inner: Mutex<Inner>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl ThreadScheduler {
    pub fn new() -> std::io::Result<Self> {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(config.thread_name)
            .spawn(move || run_timer(receiver))?;

        Ok(Self {
            inner: Mutex::new(Inner {
                sender: Some(sender),
                next_seq: 0,
            }),
            worker: Mutex::new(Some(worker)),
        })
    }
}

impl CloseScheduler for ThreadScheduler {
    fn schedule_close(&self, delay: Duration, closer: Arc<dyn WindowCloser>) {
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        let job = Job {
            deadline: Instant::now() + delay,
            seq,
            closer,
        };
        let sent = match &inner.sender {
            Some(sender) => sender.send(job).is_ok(),
            None => false,
        };
        if !sent {
            warn!("Close scheduler stopped; window close dropped");
        }
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.inner.lock().sender.take();
        if let Some(worker) = self.worker.lock().take() {
            // The last handle can be released by a close running on the
            // timer thread itself.
            if worker.thread().id() == thread::current().id() {
                return;
            }
            if worker.join().is_err() {
                error!("Close scheduler thread panicked");
            }
        }
    }
}

fn run_timer(receiver: Receiver<Job>) {
    let mut queue: BinaryHeap<Reverse<Job>> = BinaryHeap::new();

    loop {
        while queue
            .peek()
            .is_some_and(|Reverse(job)| job.deadline <= Instant::now())
        {
            if let Some(Reverse(job)) = queue.pop() {
                crate::run_close(job.closer.as_ref());
            }
        }

        let received = match queue.peek() {
            Some(Reverse(next)) => {
                receiver.recv_timeout(next.deadline.saturating_duration_since(Instant::now()))
            }
            None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(job) => queue.push(Reverse(job)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    debug!(remaining = queue.len(), "Close scheduler draining");
    while let Some(Reverse(job)) = queue.pop() {
        crate::run_close(job.closer.as_ref());
    }
}
