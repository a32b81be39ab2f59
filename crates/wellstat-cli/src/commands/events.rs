//! Events command implementation

use anyhow::{bail, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use wellstat::prelude::*;

/// Raw time bounds as given on the command line
pub struct RangeArgs {
    pub begin: Option<String>,
    pub begin_excluded: bool,
    pub end: Option<String>,
    pub end_excluded: bool,
}

impl RangeArgs {
    fn boundaries(&self) -> Result<(TimeBoundary, TimeBoundary)> {
        Ok((
            to_boundary(self.begin.as_deref(), self.begin_excluded)?,
            to_boundary(self.end.as_deref(), self.end_excluded)?,
        ))
    }
}

pub fn execute(
    config: StoreConfig,
    wellbore: &str,
    range: RangeArgs,
    limit: u32,
    json: bool,
) -> Result<()> {
    let (begin, end) = range.boundaries()?;
    let db = super::open(config)?;

    let events = db
        .store()
        .get_event_record(wellbore, begin, end, limit)
        .context("Failed to query events")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&events)?);
        return Ok(());
    }

    println!("\nEvents for {}", wellbore);
    println!("{}", "=".repeat(80));
    if events.is_empty() {
        println!("No events in range.");
        return Ok(());
    }

    for event in &events {
        let aux = if event.auxiliary.is_empty() {
            String::from("-")
        } else {
            hex::encode(&event.auxiliary)
        };
        println!(
            "{:<30} {:>8} {:<8} {}",
            format_timestamp(event.timestamp_millis),
            event.description_code,
            event.level,
            aux
        );
    }
    println!("{}", "=".repeat(80));
    println!("{} event(s)", events.len());

    Ok(())
}

fn to_boundary(value: Option<&str>, excluded: bool) -> Result<TimeBoundary> {
    let Some(value) = value else {
        return Ok(TimeBoundary::not_set());
    };
    let (seconds, millis) = parse_time(value)?;
    Ok(if excluded {
        TimeBoundary::excluded(seconds, millis)
    } else {
        TimeBoundary::included(seconds, millis)
    })
}

/// Parse `seconds[.fraction]` into whole seconds and milliseconds.
///
/// The fraction is decimal: `1.5` is 1s 500ms. At most three fraction
/// digits are accepted.
fn parse_time(value: &str) -> Result<(u32, u32)> {
    let (secs, frac) = value.split_once('.').unwrap_or((value, ""));

    let seconds: u32 = secs
        .parse()
        .with_context(|| format!("Invalid seconds in time '{}'", value))?;

    if frac.len() > 3 || !frac.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid fraction in time '{}': expected up to 3 digits", value);
    }
    let millis = if frac.is_empty() {
        0
    } else {
        format!("{:0<3}", frac).parse()?
    };

    Ok((seconds, millis))
}

fn format_timestamp(timestamp_millis: u64) -> String {
    i64::try_from(timestamp_millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| format!("{}ms", timestamp_millis))
}
