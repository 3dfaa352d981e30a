/// Streak evaluation for stored habits
///
/// This is the caller side of the domain functions: it resolves the habit's
/// timezone (warning when it falls back to UTC), derives today's calendar
/// day, runs the streak computation and, on `refresh`, writes the result
/// back onto the record.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    compute_streak_report, resolve_timezone, CalendarDay, CompletionLedger, Habit, StreakReport,
};

/// Everything the tools need to report about one habit at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitEvaluation {
    /// Today's date in the habit's timezone
    pub today: CalendarDay,
    /// Name of the zone actually used ("UTC" after a fallback)
    pub timezone: String,
    pub report: StreakReport,
    /// Most recent completed day, if any
    pub last_completed: Option<CalendarDay>,
    /// Number of distinct completed days
    pub completed_days: usize,
}

/// Evaluates habits against the streak rules
///
/// Holds no state; every call derives its result from the habit passed in.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreakEngine;

impl StreakEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute the streak and day status of `habit` as of `now`
    pub fn evaluate(&self, habit: &Habit, now: DateTime<Utc>) -> HabitEvaluation {
        let resolved = resolve_timezone(&habit.user_timezone);
        if resolved.fell_back {
            tracing::warn!(
                "Habit {} has unusable timezone '{}', evaluating in UTC",
                habit.id,
                habit.user_timezone
            );
        }

        let ledger = CompletionLedger::build_in(&habit.completed_dates, resolved.zone);
        let today = habit.today(now);
        let report = compute_streak_report(today, &habit.recurrence(), &ledger);

        if report.capped {
            tracing::info!(
                "Habit {} streak {} hit the lookback cap and may be longer",
                habit.id,
                report.streak
            );
        }

        HabitEvaluation {
            today,
            timezone: resolved.zone.name().to_string(),
            report,
            last_completed: ledger.latest(),
            completed_days: ledger.len(),
        }
    }

    /// Evaluate and store the derived streak on the record
    ///
    /// Returns the evaluation and whether the stored streak changed.
    pub fn refresh(&self, habit: &mut Habit, now: DateTime<Utc>) -> (HabitEvaluation, bool) {
        let evaluation = self.evaluate(habit, now);
        let changed = habit.streak != evaluation.report.streak;

        if changed {
            tracing::debug!(
                "Streak for habit {} changed {} -> {}",
                habit.id,
                habit.streak,
                evaluation.report.streak
            );
            habit.streak = evaluation.report.streak;
        }

        (evaluation, changed)
    }
}
