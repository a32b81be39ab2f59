use rusqlite::Connection;
use tracing::debug;
use wellstat_core::{error::Result, WellboreCounter};

use crate::errors::{schema_error, statement_error};

const CREATE_STATISTICS: &str = "CREATE TABLE WellboreStatistics (
    wellboreId TEXT PRIMARY KEY,
    succeedCount INTEGER NOT NULL,
    failCount INTEGER NOT NULL
)";

const CREATE_EVENT_RECORD: &str = "CREATE TABLE EventRecord (
    wellboreId TEXT NOT NULL,
    level TEXT NOT NULL,
    descriptionCode INTEGER NOT NULL,
    timestampMillis INTEGER NOT NULL,
    auxiliary BLOB,
    PRIMARY KEY (wellboreId, descriptionCode, timestampMillis)
)";

const CREATE_EVENT_INDEX: &str = "CREATE INDEX IF NOT EXISTS EventRecord_WellboreId_Time
    ON EventRecord (wellboreId, timestampMillis)";

/// Create both tables and the event index.
///
/// Re-running against an initialized database is a no-op: "already exists"
/// failures are accepted, every other failure aborts.
pub fn create_tables(conn: &Connection) -> Result<()> {
    create_idempotent(conn, "WellboreStatistics", CREATE_STATISTICS)?;
    create_idempotent(conn, "EventRecord", CREATE_EVENT_RECORD)?;
    conn.execute_batch(CREATE_EVENT_INDEX)
        .map_err(schema_error)?;
    Ok(())
}

fn create_idempotent(conn: &Connection, name: &str, sql: &str) -> Result<()> {
    match conn.execute_batch(sql) {
        Ok(()) => {
            debug!("Created table {}", name);
            Ok(())
        }
        Err(e) if is_already_exists(&e) => Ok(()),
        Err(e) => Err(schema_error(e)),
    }
}

fn is_already_exists(err: &rusqlite::Error) -> bool {
    err.to_string().contains("already exists")
}

/// Scan every counter row into `accumulator`.
///
/// Rows with an empty wellbore id are skipped. Returns the number of rows
/// appended.
pub fn load_counters(conn: &Connection, accumulator: &mut Vec<WellboreCounter>) -> Result<usize> {
    let mut stmt = conn
        .prepare("SELECT wellboreId, succeedCount, failCount FROM WellboreStatistics")
        .map_err(statement_error)?;
    let rows = stmt
        .query_map([], |row| {
            // Counters are stored as the bit-identical i64.
            Ok(WellboreCounter {
                wellbore_id: row.get(0)?,
                succeed_count: row.get::<_, i64>(1)? as u64,
                fail_count: row.get::<_, i64>(2)? as u64,
            })
        })
        .map_err(statement_error)?;

    let before = accumulator.len();
    for row in rows {
        let counter = row.map_err(statement_error)?;
        if !counter.wellbore_id.is_empty() {
            accumulator.push(counter);
        }
    }
    Ok(accumulator.len() - before)
}
