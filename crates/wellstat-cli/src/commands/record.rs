//! Record command implementations

use anyhow::{Context, Result};
use std::time::Duration;
use wellstat::prelude::*;

// Slack on top of the close delay before giving up on the scheduled close.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

pub fn stat(config: StoreConfig, wellbore: &str, succeed: u64, fail: u64) -> Result<()> {
    validate_wellbore(wellbore)?;
    let db = super::open(config)?;

    let (total_succeed, total_fail) = db
        .store()
        .update_data_statistics(wellbore, succeed, fail)
        .context("Failed to update statistics")?;

    let status = finish(&db)?;
    println!(
        "{}: succeeded {} failed {} ({})",
        wellbore, total_succeed, total_fail, status
    );
    Ok(())
}

pub fn event(
    config: StoreConfig,
    wellbore: &str,
    code: u32,
    seconds: u32,
    millis: u32,
    aux_hex: Option<String>,
) -> Result<()> {
    validate_wellbore(wellbore)?;
    anyhow::ensure!(millis < 1000, "millis must be below 1000, got {}", millis);

    let auxiliary = aux_hex
        .map(|h| hex::decode(h.trim_start_matches("0x")))
        .transpose()
        .context("Invalid --aux-hex payload")?;

    let db = super::open(config)?;
    db.store()
        .update_event_record(wellbore, code, seconds, millis, auxiliary.as_deref())
        .context("Failed to record event")?;

    let status = finish(&db)?;
    println!("{}: event {} at {}.{:03} ({})", wellbore, code, seconds, millis, status);
    Ok(())
}

fn validate_wellbore(wellbore: &str) -> Result<()> {
    anyhow::ensure!(!wellbore.is_empty(), "wellbore id must not be empty");
    Ok(())
}

/// Wait for the scheduled close, flushing if it does not come in time.
///
/// The scheduler does not report how the window ended, so a scheduled
/// close is only reported as closed.
fn finish(db: &TelemetryDb) -> Result<&'static str> {
    let timeout = db.store().config().close_delay() + CLOSE_GRACE;
    if db.wait_idle(timeout) {
        tracing::debug!("Transaction window closed by scheduler");
        return Ok("closed");
    }
    tracing::warn!("Scheduled close did not finish in time; flushing");
    let outcome = db.flush().context("Failed to close transaction window")?;
    Ok(describe(outcome))
}

fn describe(outcome: CloseOutcome) -> &'static str {
    match outcome {
        CloseOutcome::Committed => "committed",
        CloseOutcome::RolledBack => "rolled back",
        CloseOutcome::Idle => "closed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(dir: &tempfile::TempDir) -> StoreConfig {
        StoreConfig::new(dir.path().join("TranServer.db")).with_close_delay_ms(10)
    }

    #[test]
    fn test_empty_wellbore_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let err = stat(config(&dir), "", 1, 1).unwrap_err();
        assert!(err.to_string().contains("wellbore id must not be empty"));

        let err = event(config(&dir), "", 10, 1, 0, None).unwrap_err();
        assert!(err.to_string().contains("wellbore id must not be empty"));

        // Rejected before the database is touched.
        assert!(!dir.path().join("TranServer.db").exists());
    }

    #[test]
    fn test_record_stat_persists() {
        let dir = tempfile::tempdir().unwrap();
        stat(config(&dir), "W1", 3, 1).unwrap();
        stat(config(&dir), "W1", 2, 0).unwrap();

        let db = TelemetryDb::open_with_config(config(&dir)).unwrap();
        assert_eq!(db.store().get_data_statistics("W1"), Some((5, 1)));
    }

    #[test]
    fn test_invalid_event_arguments() {
        let dir = tempfile::tempdir().unwrap();
        assert!(event(config(&dir), "W1", 10, 1, 1000, None).is_err());
        assert!(event(config(&dir), "W1", 10, 1, 0, Some("zz".into())).is_err());
    }

    #[test]
    fn test_describe_outcomes() {
        assert_eq!(describe(CloseOutcome::Committed), "committed");
        assert_eq!(describe(CloseOutcome::RolledBack), "rolled back");
        assert_eq!(describe(CloseOutcome::Idle), "closed");
    }
}
