/// Tool for checking habit status and streaks
///
/// This module implements the habit_status MCP tool. Streaks are evaluated
/// fresh at `now` rather than read from the stored column, so the output is
/// correct even if the periodic re-evaluation has not run yet today.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::engine::StreakEngine;
use crate::storage::{HabitStorage, StorageError};
use crate::tools::parse_habit_id;

/// Parameters for checking habit status
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub habit_id: Option<String>, // If omitted, returns all active habits
}

/// Status of a single habit as of the evaluation instant
#[derive(Debug, Serialize)]
pub struct HabitStatus {
    pub habit_id: String,
    pub name: String,
    pub schedule: String,
    pub timezone: String,
    pub today: String,
    pub due_today: bool,
    pub completed_today: bool,
    pub current_streak: u32,
    /// The streak filled the whole lookback window and may be longer
    pub streak_capped: bool,
    pub last_completed: Option<String>,
    pub is_active: bool,
}

/// Response from checking habit status
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub habits: Vec<HabitStatus>,
    pub summary: String,
    pub message: String,
}

fn habit_status(engine: &StreakEngine, habit: &Habit, now: DateTime<Utc>) -> HabitStatus {
    let evaluation = engine.evaluate(habit, now);

    HabitStatus {
        habit_id: habit.id.to_string(),
        name: habit.name.clone(),
        schedule: habit.recurrence().describe(),
        timezone: evaluation.timezone,
        today: evaluation.today.to_string(),
        due_today: evaluation.report.due_today,
        completed_today: evaluation.report.completed_today,
        current_streak: evaluation.report.streak,
        streak_capped: evaluation.report.capped,
        last_completed: evaluation.last_completed.map(|d| d.to_string()),
        is_active: habit.is_active,
    }
}

fn format_status(status: &HabitStatus) -> String {
    let today_line = match (status.due_today, status.completed_today) {
        (true, true) => "done today",
        (true, false) => "due today, not done yet",
        (false, true) => "bonus completion today",
        (false, false) => "not due today",
    };
    let streak = if status.streak_capped {
        format!("{}+", status.current_streak)
    } else {
        status.current_streak.to_string()
    };

    let mut text = format!(
        "🎯 {} ({}...)\n   Schedule: {} | Today ({}, {}): {}\n   Current streak: {}",
        status.name,
        &status.habit_id[..8],
        status.schedule,
        status.today,
        status.timezone,
        today_line,
        streak
    );
    if let Some(last) = &status.last_completed {
        text.push_str(&format!(" | Last completed: {}", last));
    }
    if !status.is_active {
        text.push_str(" ⏸️ (paused)");
    }
    text
}

/// Get status for one habit or all active habits
pub fn get_habit_status<S: HabitStorage>(
    storage: &S,
    params: StatusParams,
    now: DateTime<Utc>,
) -> Result<StatusResponse, StorageError> {
    let engine = StreakEngine::new();

    let habits = match params.habit_id {
        Some(raw_id) => {
            let habit_id = parse_habit_id(&raw_id)?;
            vec![storage.get_habit(&habit_id)?]
        }
        None => storage.list_habits(true)?,
    };

    let statuses: Vec<HabitStatus> = habits
        .iter()
        .map(|habit| habit_status(&engine, habit, now))
        .collect();

    let summary = if statuses.is_empty() {
        "No habits found. Create your first habit to get started!".to_string()
    } else {
        let pending = statuses
            .iter()
            .filter(|s| s.due_today && !s.completed_today)
            .count();
        let streaking = statuses.iter().filter(|s| s.current_streak > 0).count();
        format!(
            "📊 {} habit(s): {} with an active streak, {} still due today",
            statuses.len(),
            streaking,
            pending
        )
    };

    let message = if statuses.is_empty() {
        summary.clone()
    } else {
        format!(
            "{}\n\n{}",
            summary,
            statuses.iter().map(format_status).collect::<Vec<_>>().join("\n\n")
        )
    };

    Ok(StatusResponse {
        habits: statuses,
        summary,
        message,
    })
}
