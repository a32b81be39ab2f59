//! wellstat core: types and traits for transmission-server telemetry persistence
//!
//! This crate defines what the store persists and the seams it talks through:
//! - Per-wellbore success/failure counters
//! - An append-only, time-keyed event log with optional binary payloads
//! - Time boundaries for ranged event queries
//! - The transaction window that batches writes into one commit
//! - `CloseScheduler` / `WindowCloser`: how a deferred window close is fired
//! - `LevelResolver`: description code to level text

pub mod config;
pub mod error;
pub mod observe;
pub mod traits;
pub mod types;

pub use config::{StoreConfig, SynchronousMode};
pub use error::{Result, StoreError};
pub use traits::{CloseScheduler, DefaultLevels, LevelResolver, LevelTable, WindowCloser};
pub use types::{
    decode_wellbore_id, encode_wellbore_id, normalize_range, BoundaryTag, CloseOutcome,
    EventRecord, TimeBoundary, TransactionWindow, WellboreCounter, WindowState, WELLBORE_ID_LEN,
};
