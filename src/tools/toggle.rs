/// Tool for marking a habit done (or not done) on a day
///
/// This module implements the habit_toggle MCP tool. Toggling a day that
/// already has a completion removes every completion on that local day;
/// otherwise a new completion is recorded. The streak is recomputed and
/// written back either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{normalize_in, parse_instant, resolve_timezone, CompletionToggle};
use crate::engine::StreakEngine;
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Parameters for toggling a completion
#[derive(Debug, Deserialize)]
pub struct ToggleCompletionParams {
    pub habit_id: String,
    /// RFC 3339 instant or YYYY-MM-DD local date, defaults to now
    pub date: Option<String>,
}

/// Response from toggling a completion
#[derive(Debug, Serialize)]
pub struct ToggleCompletionResponse {
    pub success: bool,
    /// Whether the day is completed after the toggle
    pub completed: bool,
    /// The local calendar day that was toggled
    pub day: String,
    pub current_streak: u32,
    pub message: String,
}

/// Toggle the completion state of one day and refresh the stored streak
pub fn toggle_completion<S: HabitStorage>(
    storage: &S,
    params: ToggleCompletionParams,
    now: DateTime<Utc>,
) -> Result<ToggleCompletionResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let mut habit = storage.get_habit(&habit_id)?;

    let zone = resolve_timezone(&habit.user_timezone).zone;
    let instant = match params.date.as_deref() {
        Some(raw) => parse_instant(raw, zone)?,
        None => now,
    };
    let day = normalize_in(instant, zone);

    let completed = match habit.toggle_completion(instant) {
        CompletionToggle::Added(added) => {
            storage.add_completion(&habit.id, added)?;
            true
        }
        CompletionToggle::Removed(removed) => {
            storage.remove_completions(&habit.id, &removed)?;
            false
        }
    };

    let (evaluation, _) = StreakEngine::new().refresh(&mut habit, now);
    storage.update_streak(&habit.id, habit.streak)?;

    tracing::info!(
        "Toggled habit {} on {}: completed={}, streak={}",
        habit.id,
        day,
        completed,
        habit.streak
    );

    let action = if completed { "✅ Marked" } else { "↩️ Unmarked" };
    let message = format!(
        "{} '{}' for {}. Current streak: {}\n{}",
        action,
        habit.name,
        day,
        habit.streak,
        evaluation.report.motivational_message()
    );

    Ok(ToggleCompletionResponse {
        success: true,
        completed,
        day: day.to_string(),
        current_streak: habit.streak,
        message,
    })
}
