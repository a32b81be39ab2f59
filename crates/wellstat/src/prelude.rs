//! wellstat Prelude
//!
//! ```
//! use wellstat::prelude::*;
//! ```

// Core types
pub use crate::{
    CloseOutcome, EventRecord, Result, StoreError, TelemetryDb, TimeBoundary, TransactionWindow,
    WellboreCounter,
};

// Configs
pub use crate::{SchedulerConfig, StoreConfig, SynchronousMode};

// Traits
pub use crate::{CloseScheduler, LevelResolver, WindowCloser};

// Implementations
pub use crate::{
    DefaultLevels, LevelTable, ManualScheduler, PersistenceManager, ThreadScheduler,
    TokioScheduler,
};

// Re-export common external deps
pub use anyhow;
pub use std::sync::Arc;
pub use tracing;
