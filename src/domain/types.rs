/// Core types used throughout the domain layer
///
/// This module defines the habit identifier, the seven weekday tags and the
/// recurrence rule built from a habit's raw frequency list.

use std::collections::BTreeSet;
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a habit
///
/// This is a wrapper around UUID to provide type safety when passing habit
/// references between the storage and tool layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(pub Uuid);

impl HabitId {
    /// Generate a new random habit ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a habit ID from its string form (database rows, tool arguments)
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s.trim())?))
    }
}

impl Default for HabitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the seven days a habit can be scheduled on
///
/// Variants are declared Sunday first so the derived ordering matches the
/// 0=Sunday..6=Saturday numbering used for weekday arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayTag {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl WeekdayTag {
    /// All seven tags, Sunday first
    pub const ALL: [WeekdayTag; 7] = [
        WeekdayTag::Sunday,
        WeekdayTag::Monday,
        WeekdayTag::Tuesday,
        WeekdayTag::Wednesday,
        WeekdayTag::Thursday,
        WeekdayTag::Friday,
        WeekdayTag::Saturday,
    ];

    /// Parse a raw frequency token, ignoring case and surrounding whitespace
    ///
    /// Returns `None` for anything that is not one of the seven full day names.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_lowercase().as_str() {
            "sunday" => Some(WeekdayTag::Sunday),
            "monday" => Some(WeekdayTag::Monday),
            "tuesday" => Some(WeekdayTag::Tuesday),
            "wednesday" => Some(WeekdayTag::Wednesday),
            "thursday" => Some(WeekdayTag::Thursday),
            "friday" => Some(WeekdayTag::Friday),
            "saturday" => Some(WeekdayTag::Saturday),
            _ => None,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekdayTag::Sunday => "sunday",
            WeekdayTag::Monday => "monday",
            WeekdayTag::Tuesday => "tuesday",
            WeekdayTag::Wednesday => "wednesday",
            WeekdayTag::Thursday => "thursday",
            WeekdayTag::Friday => "friday",
            WeekdayTag::Saturday => "saturday",
        }
    }

    /// Day number with 0 = Sunday through 6 = Saturday
    pub fn index(&self) -> u8 {
        *self as u8
    }
}

impl From<Weekday> for WeekdayTag {
    fn from(weekday: Weekday) -> Self {
        WeekdayTag::ALL[weekday.num_days_from_sunday() as usize]
    }
}

impl fmt::Display for WeekdayTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of weekdays on which a habit is due
///
/// Built from a habit's raw `frequency` strings. Duplicates collapse and
/// unrecognized tokens are dropped, so construction never fails. An empty
/// rule means the habit is never due.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule(BTreeSet<WeekdayTag>);

impl RecurrenceRule {
    /// Build a rule from raw frequency tokens such as `["Monday", "FRIDAY"]`
    pub fn from_frequency<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            raw.into_iter()
                .filter_map(|token| WeekdayTag::parse(token.as_ref()))
                .collect(),
        )
    }

    /// A rule that is due on all seven days
    pub fn every_day() -> Self {
        Self(WeekdayTag::ALL.into_iter().collect())
    }

    pub fn contains(&self, tag: WeekdayTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Tags in Sunday..Saturday order
    pub fn iter(&self) -> impl Iterator<Item = WeekdayTag> + '_ {
        self.0.iter().copied()
    }

    /// Human-readable schedule, e.g. "monday, wednesday, friday"
    pub fn describe(&self) -> String {
        if self.0.is_empty() {
            return "never".to_string();
        }
        if self.0.len() == WeekdayTag::ALL.len() {
            return "every day".to_string();
        }
        self.iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<WeekdayTag> for RecurrenceRule {
    fn from_iter<T: IntoIterator<Item = WeekdayTag>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
