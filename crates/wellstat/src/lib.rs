//! wellstat: telemetry persistence for a transmission server
//!
//! wellstat keeps two things per wellbore in one SQLite database:
//! - **Counters**: running success/failure totals, cached in memory
//! - **Event log**: time-keyed events with an optional binary payload
//!
//! Writes are batched into transaction windows. The first write after an
//! idle period opens a window; a scheduled close commits it (or rolls it
//! back if any write in it failed) `close_delay_ms` later.
//!
//! # Quick Start
//!
//! ```no_run
//! use wellstat::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let db = TelemetryDb::open("./Persistence/TranServer.db")?;
//!
//! db.store().update_data_statistics("W1", 3, 1)?;
//! db.store().update_event_record("W1", 1001, 1_700_000_000, 250, None)?;
//!
//! let recent = db.store().get_event_record(
//!     "W1",
//!     TimeBoundary::not_set(),
//!     TimeBoundary::not_set(),
//!     10,
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod prelude;

// Re-export core types
pub use wellstat_core::{
    config::{StoreConfig, SynchronousMode},
    error::{Result, StoreError},
    traits::{CloseScheduler, DefaultLevels, LevelResolver, LevelTable, WindowCloser},
    types::{
        decode_wellbore_id, encode_wellbore_id, normalize_range, BoundaryTag, CloseOutcome,
        EventRecord, TimeBoundary, TransactionWindow, WellboreCounter, WindowState,
        WELLBORE_ID_LEN,
    },
};

// Re-export implementations
pub use wellstat_scheduler::{ManualScheduler, SchedulerConfig, ThreadScheduler, TokioScheduler};
pub use wellstat_sqlite::{PersistenceManager, RangeQuery};

pub use db::TelemetryDb;
