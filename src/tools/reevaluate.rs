/// Tool for recomputing every stored streak
///
/// This module implements the habit_reevaluate MCP tool. A streak can go
/// stale without any completion changing: once a due day passes without a
/// completion, the stored value is out of date. The server runs this at
/// startup and on a periodic tick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::StreakEngine;
use crate::storage::{HabitStorage, StorageError};

/// Parameters for re-evaluating streaks (none yet)
#[derive(Debug, Default, Deserialize)]
pub struct ReevaluateParams {}

/// Response from a re-evaluation pass
#[derive(Debug, Serialize)]
pub struct ReevaluateResponse {
    pub success: bool,
    pub evaluated: usize,
    pub updated: usize,
    pub message: String,
}

/// Recompute all active habits' streaks and store the ones that changed
pub fn reevaluate_streaks<S: HabitStorage>(
    storage: &S,
    _params: ReevaluateParams,
    now: DateTime<Utc>,
) -> Result<ReevaluateResponse, StorageError> {
    let engine = StreakEngine::new();
    let habits = storage.list_habits(true)?;

    let mut updated = 0;
    for mut habit in habits.iter().cloned() {
        let (_, changed) = engine.refresh(&mut habit, now);
        if changed {
            storage.update_streak(&habit.id, habit.streak)?;
            updated += 1;
        }
    }

    tracing::info!(
        "Re-evaluated {} habit(s), {} streak(s) changed",
        habits.len(),
        updated
    );

    Ok(ReevaluateResponse {
        success: true,
        evaluated: habits.len(),
        updated,
        message: format!(
            "🔄 Re-evaluated {} habit(s); {} streak(s) updated",
            habits.len(),
            updated
        ),
    })
}
