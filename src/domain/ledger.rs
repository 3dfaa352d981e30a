/// The set of calendar days on which a habit was completed

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::domain::calendar::{normalize_in, resolve_timezone, CalendarDay};

/// Completed calendar days for one habit, keyed in the habit's timezone
///
/// Construction is O(n) over the raw completions; membership checks are
/// O(1). Several completions on the same local day collapse into one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionLedger {
    days: HashSet<CalendarDay>,
    zone: Tz,
}

impl CompletionLedger {
    /// Build a ledger from raw completion instants
    ///
    /// An empty or unknown timezone name is treated as UTC.
    pub fn build(raw_completions: &[DateTime<Utc>], timezone: &str) -> Self {
        Self::build_in(raw_completions, resolve_timezone(timezone).zone)
    }

    /// Build a ledger when the zone has already been resolved
    pub fn build_in(raw_completions: &[DateTime<Utc>], zone: Tz) -> Self {
        Self {
            days: raw_completions
                .iter()
                .map(|instant| normalize_in(*instant, zone))
                .collect(),
            zone,
        }
    }

    /// A ledger from days that are already normalized
    pub fn from_days<I>(days: I, zone: Tz) -> Self
    where
        I: IntoIterator<Item = CalendarDay>,
    {
        Self {
            days: days.into_iter().collect(),
            zone,
        }
    }

    pub fn contains(&self, day: CalendarDay) -> bool {
        self.days.contains(&day)
    }

    /// Whether the habit was completed on the local day `instant` falls on
    pub fn is_completed_for_date(&self, instant: DateTime<Utc>) -> bool {
        self.contains(normalize_in(instant, self.zone))
    }

    /// Record one more completed day, returns false if it was already present
    pub fn insert(&mut self, day: CalendarDay) -> bool {
        self.days.insert(day)
    }

    /// Most recent completed day
    pub fn latest(&self) -> Option<CalendarDay> {
        self.days.iter().max().copied()
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CalendarDay> + '_ {
        self.days.iter().copied()
    }
}
