//! SQLite-backed telemetry store
//!
//! Persists per-wellbore counters and an append-only event log.
//!
//! Key features:
//! - Transaction windows: writes within `close_delay_ms` share one commit
//! - Rollback of the whole window when any write in it failed
//! - In-memory counter cache, loaded at open and served without SQL
//! - Descending time-range queries with inclusive/exclusive bounds

pub mod counters;
mod errors;
mod event_log;
pub mod query;
pub mod schema;
pub mod store;
pub mod txn;

pub use counters::CounterCache;
pub use query::RangeQuery;
pub use store::PersistenceManager;
pub use txn::TransactionCoordinator;
