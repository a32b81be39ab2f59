//! Basic wellstat usage
//!
//! This example demonstrates:
//! - Opening a telemetry database
//! - Recording counters and events in one transaction window
//! - Waiting for the window to commit
//! - Querying events by time range
//!
//! Run with: cargo run --example basic_usage

use std::time::Duration;
use wellstat::prelude::*;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("wellstat=debug,wellstat_sqlite=debug")
        .init();

    let temp_dir = tempfile::tempdir()?;
    let db_path = temp_dir.path().join("Persistence").join("TranServer.db");

    // 1. Open
    println!("Opening {}", db_path.display());
    let db = TelemetryDb::open(&db_path)?;

    // 2. Record. Everything below lands in one window.
    db.store().update_data_statistics("WELL-A", 12, 1)?;
    db.store().update_data_statistics("WELL-B", 4, 0)?;
    for (i, code) in [15u32, 1200, 2100].into_iter().enumerate() {
        db.store().update_event_record(
            "WELL-A",
            code,
            1_700_000_000 + i as u32,
            125,
            Some(&[code as u8, 0xff][..]),
        )?;
    }
    println!("Window open: {}", db.store().window_state().is_open());

    // 3. Commit
    db.wait_idle(Duration::from_secs(2));
    println!("Window open: {}", db.store().window_state().is_open());

    // 4. Query
    for counter in db.store().data_statistics() {
        println!(
            "{}: {} succeeded, {} failed",
            counter.wellbore_id, counter.succeed_count, counter.fail_count
        );
    }

    let recent = db.store().get_event_record(
        "WELL-A",
        TimeBoundary::included(1_700_000_001, 0),
        TimeBoundary::not_set(),
        10,
    )?;
    for event in &recent {
        println!(
            "{}.{:03} code={} level={} aux={:?}",
            event.time_sec(),
            event.time_millis(),
            event.description_code,
            event.level,
            event.auxiliary
        );
    }

    Ok(())
}
