use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How a time bound participates in a range query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoundaryTag {
    /// The side is unbounded.
    #[default]
    NotSet,
    /// `>=` for the lower bound, `<=` for the upper bound.
    Included,
    /// `>` for the lower bound, `<` for the upper bound.
    Excluded,
}

/// One side of an event-log time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeBoundary {
    pub tag: BoundaryTag,
    pub seconds: u32,
    pub millis: u32,
}

impl TimeBoundary {
    pub fn not_set() -> Self {
        Self::default()
    }

    pub fn included(seconds: u32, millis: u32) -> Self {
        Self {
            tag: BoundaryTag::Included,
            seconds,
            millis,
        }
    }

    pub fn excluded(seconds: u32, millis: u32) -> Self {
        Self {
            tag: BoundaryTag::Excluded,
            seconds,
            millis,
        }
    }

    pub fn is_set(&self) -> bool {
        self.tag != BoundaryTag::NotSet
    }

    /// Combined millisecond timestamp, matching `EventRecord::timestamp_millis`.
    pub fn timestamp_millis(&self) -> u64 {
        u64::from(self.seconds) * 1000 + u64::from(self.millis)
    }

    /// Order by seconds, then milliseconds. The tag is ignored.
    pub fn cmp_time(&self, other: &TimeBoundary) -> Ordering {
        (self.seconds, self.millis).cmp(&(other.seconds, other.millis))
    }
}

/// Put a `(begin, end)` pair in ascending order when both sides are set.
pub fn normalize_range(begin: TimeBoundary, end: TimeBoundary) -> (TimeBoundary, TimeBoundary) {
    if begin.is_set() && end.is_set() && end.cmp_time(&begin) == Ordering::Less {
        (end, begin)
    } else {
        (begin, end)
    }
}
