/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool. Changing the schedule
/// or timezone changes which days are due and how completions map to days,
/// so the streak is recomputed after every update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::engine::StreakEngine;
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize)]
pub struct UpdateHabitParams {
    pub habit_id: String,
    pub name: Option<String>,
    pub frequency: Option<Vec<String>>,
    pub timezone: Option<String>,
    pub is_active: Option<bool>,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub current_streak: u32,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
    now: DateTime<Utc>,
) -> Result<UpdateHabitResponse, StorageError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    if params.name.is_none()
        && params.frequency.is_none()
        && params.timezone.is_none()
        && params.is_active.is_none()
    {
        return Err(DomainError::Validation {
            message: "Nothing to update".to_string(),
        }
        .into());
    }

    let mut habit = storage.get_habit(&habit_id)?;
    habit.update(params.name, params.frequency, params.timezone, params.is_active)?;
    storage.update_habit(&habit)?;

    let (_, changed) = StreakEngine::new().refresh(&mut habit, now);
    if changed {
        storage.update_streak(&habit.id, habit.streak)?;
    }

    let message = match params.is_active {
        Some(false) => format!("⏸️ Paused habit '{}'", habit.name),
        Some(true) => format!("▶️ Reactivated habit '{}'", habit.name),
        None => format!(
            "✅ Updated habit '{}' (due: {}). Current streak: {}",
            habit.name,
            habit.recurrence().describe(),
            habit.streak
        ),
    };

    Ok(UpdateHabitResponse {
        success: true,
        current_streak: habit.streak,
        message,
    })
}
