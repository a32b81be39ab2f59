use rusqlite::{params, Connection};
use std::collections::HashMap;
use wellstat_core::WellboreCounter;

/// In-memory mirror of the per-wellbore counters.
///
/// The cache is updated before the corresponding UPSERT is known to have
/// succeeded, so reads reflect pending writes of the open window.
#[derive(Debug, Default)]
pub struct CounterCache {
    entries: HashMap<String, (u64, u64)>,
}

impl CounterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache contents with loaded rows.
    pub fn load(&mut self, rows: Vec<WellboreCounter>) {
        self.entries = rows
            .into_iter()
            .map(|c| (c.wellbore_id, (c.succeed_count, c.fail_count)))
            .collect();
    }

    pub fn get(&self, wellbore_id: &str) -> Option<(u64, u64)> {
        self.entries.get(wellbore_id).copied()
    }

    /// Add the increments to the cached totals (zero when absent) and
    /// return the new totals.
    pub fn apply(&mut self, wellbore_id: &str, succ_inc: u64, fail_inc: u64) -> (u64, u64) {
        let entry = self
            .entries
            .entry(wellbore_id.to_string())
            .or_insert((0, 0));
        entry.0 = entry.0.saturating_add(succ_inc);
        entry.1 = entry.1.saturating_add(fail_inc);
        *entry
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn snapshot(&self) -> Vec<WellboreCounter> {
        let mut out: Vec<_> = self
            .entries
            .iter()
            .map(|(id, (succ, fail))| WellboreCounter::new(id.clone(), *succ, *fail))
            .collect();
        out.sort_by(|a, b| a.wellbore_id.cmp(&b.wellbore_id));
        out
    }
}

/// Insert the row, or overwrite its totals if the wellbore already exists.
pub(crate) fn upsert(
    conn: &Connection,
    wellbore_id: &str,
    (succeed_count, fail_count): (u64, u64),
) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO WellboreStatistics (wellboreId, succeedCount, failCount)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(wellboreId) DO UPDATE SET
             succeedCount = excluded.succeedCount,
             failCount = excluded.failCount",
        params![wellbore_id, succeed_count as i64, fail_count as i64],
    )
}
