//! Scheduler configuration.

/// Configuration for the thread scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Name of the timer thread.
    pub thread_name: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            thread_name: "wellstat-close".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timer thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}
