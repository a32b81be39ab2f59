use serde::{Deserialize, Serialize};

/// Success/failure counters persisted for one wellbore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellboreCounter {
    pub wellbore_id: String,
    pub succeed_count: u64,
    pub fail_count: u64,
}

impl WellboreCounter {
    pub fn new(wellbore_id: impl Into<String>, succeed_count: u64, fail_count: u64) -> Self {
        Self {
            wellbore_id: wellbore_id.into(),
            succeed_count,
            fail_count,
        }
    }

    pub fn totals(&self) -> (u64, u64) {
        (self.succeed_count, self.fail_count)
    }
}
