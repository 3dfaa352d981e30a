/// Habit record and completion toggling
///
/// `Habit` is the stored record the engine reads from. It keeps the raw
/// `frequency` strings and timezone name exactly as the user supplied them;
/// the recurrence rule and completion ledger are derived on demand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::calendar::{normalize_in, resolve_timezone, CalendarDay};
use crate::domain::{CompletionLedger, DomainError, HabitId, RecurrenceRule};

/// A habit with a weekly schedule and its completion history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Run")
    pub name: String,
    /// Raw weekday names, any case; unrecognized entries are ignored
    pub frequency: Vec<String>,
    /// IANA timezone name; empty or unknown means UTC
    pub user_timezone: String,
    /// Every instant the habit was marked done
    pub completed_dates: Vec<DateTime<Utc>>,
    /// Last derived streak, written back by the caller
    pub streak: u32,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
    /// Whether this habit is currently active (can be paused)
    pub is_active: bool,
}

/// What `Habit::toggle_completion` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionToggle {
    /// The instant was recorded as a new completion
    Added(DateTime<Utc>),
    /// These stored completions shared the instant's calendar day and were removed
    Removed(Vec<DateTime<Utc>>),
}

impl Habit {
    /// Create a new habit with validation
    pub fn new(
        name: String,
        frequency: Vec<String>,
        user_timezone: String,
    ) -> Result<Self, DomainError> {
        let name = Self::validate_name(&name)?;

        Ok(Self {
            id: HabitId::new(),
            name,
            frequency,
            user_timezone: user_timezone.trim().to_string(),
            completed_dates: Vec::new(),
            streak: 0,
            created_at: Utc::now(),
            is_active: true,
        })
    }

    /// Create a habit from existing data (used when loading from database)
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        frequency: Vec<String>,
        user_timezone: String,
        completed_dates: Vec<DateTime<Utc>>,
        streak: u32,
        created_at: DateTime<Utc>,
        is_active: bool,
    ) -> Self {
        Self {
            id,
            name,
            frequency,
            user_timezone,
            completed_dates,
            streak,
            created_at,
            is_active,
        }
    }

    /// Update the habit's properties with validation
    pub fn update(
        &mut self,
        name: Option<String>,
        frequency: Option<Vec<String>>,
        user_timezone: Option<String>,
        is_active: Option<bool>,
    ) -> Result<(), DomainError> {
        let name = name.map(|n| Self::validate_name(&n)).transpose()?;

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_frequency) = frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_timezone) = user_timezone {
            self.user_timezone = new_timezone.trim().to_string();
        }
        if let Some(new_is_active) = is_active {
            self.is_active = new_is_active;
        }

        Ok(())
    }

    pub fn recurrence(&self) -> RecurrenceRule {
        RecurrenceRule::from_frequency(&self.frequency)
    }

    pub fn ledger(&self) -> CompletionLedger {
        CompletionLedger::build(&self.completed_dates, &self.user_timezone)
    }

    /// The calendar day `now` falls on in this habit's timezone
    pub fn today(&self, now: DateTime<Utc>) -> CalendarDay {
        normalize_in(now, resolve_timezone(&self.user_timezone).zone)
    }

    /// Whether any completion falls on the same local day as `instant`
    pub fn is_completed_for_date(&self, instant: DateTime<Utc>) -> bool {
        self.ledger().is_completed_for_date(instant)
    }

    /// Flip the completion state of the local day containing `instant`
    ///
    /// Does not touch `streak`; the caller recomputes and writes it back.
    pub fn toggle_completion(&mut self, instant: DateTime<Utc>) -> CompletionToggle {
        let zone = resolve_timezone(&self.user_timezone).zone;
        let target = normalize_in(instant, zone);

        let (removed, kept): (Vec<_>, Vec<_>) = self
            .completed_dates
            .iter()
            .copied()
            .partition(|completed| normalize_in(*completed, zone) == target);

        if removed.is_empty() {
            self.completed_dates.push(instant);
            CompletionToggle::Added(instant)
        } else {
            self.completed_dates = kept;
            CompletionToggle::Removed(removed)
        }
    }

    /// Trim and check the habit name, returning the trimmed form
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(trimmed.to_string())
    }
}
