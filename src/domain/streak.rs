/// Current-streak calculation
///
/// The streak is derived fresh on every call from three inputs: today's
/// calendar day in the habit's timezone, the weekly recurrence rule, and the
/// completion ledger. Nothing is cached between calls.

use serde::Serialize;

use crate::domain::schedule::is_due;
use crate::domain::{CalendarDay, CompletionLedger, RecurrenceRule};

/// Upper bound on how many days the backward walk inspects
///
/// Streaks longer than this are reported as the count inside the window and
/// flagged through `StreakReport::capped`.
pub const MAX_LOOKBACK_DAYS: u32 = 365;

/// Outcome of a streak computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreakReport {
    /// Consecutive qualifying days ending today or just before it
    pub streak: u32,
    /// Whether today is a due date
    pub due_today: bool,
    /// Whether today is in the ledger
    pub completed_today: bool,
    /// The walk used the whole lookback window without finding a missed due date
    pub capped: bool,
}

impl StreakReport {
    fn broken(due_today: bool, completed_today: bool) -> Self {
        Self {
            streak: 0,
            due_today,
            completed_today,
            capped: false,
        }
    }

    /// Short encouragement line for tool output
    pub fn motivational_message(&self) -> String {
        if self.due_today && !self.completed_today {
            return "Due today and not done yet. Check it off to get the streak going.".to_string();
        }
        match self.streak {
            0 => "No active streak yet. The next scheduled day is a fresh start.".to_string(),
            1 => "One down. Keep it going next time it's due.".to_string(),
            2..=6 => format!("{} in a row. The habit is taking shape.", self.streak),
            7..=29 => format!("{} straight. Solid consistency.", self.streak),
            _ => format!("{} and counting. This one is part of your routine now.", self.streak),
        }
    }
}

/// Compute the current streak
///
/// See [`compute_streak_report`] for the rules.
pub fn compute_streak(
    today: CalendarDay,
    recurrence: &RecurrenceRule,
    ledger: &CompletionLedger,
) -> u32 {
    compute_streak_report(today, recurrence, ledger).streak
}

/// Compute the current streak along with what decided it
///
/// Rules, in order:
/// - an empty ledger has no streak;
/// - a habit due today but not completed today has no streak;
/// - otherwise today counts if completed, then the walk moves backward one
///   day at a time. A completed day counts whether or not it was due. A due
///   day without a completion ends the walk. A non-due day without a
///   completion is skipped.
///
/// The walk inspects at most [`MAX_LOOKBACK_DAYS`] days.
pub fn compute_streak_report(
    today: CalendarDay,
    recurrence: &RecurrenceRule,
    ledger: &CompletionLedger,
) -> StreakReport {
    let due_today = is_due(today, recurrence);
    let completed_today = ledger.contains(today);

    if ledger.is_empty() || (due_today && !completed_today) {
        return StreakReport::broken(due_today, completed_today);
    }

    let (mut streak, mut cursor) = if completed_today {
        (1, today.previous())
    } else {
        (0, Some(today))
    };

    for _ in 0..MAX_LOOKBACK_DAYS {
        let Some(day) = cursor else {
            // ran off the start of the representable calendar
            return StreakReport { streak, due_today, completed_today, capped: false };
        };

        if ledger.contains(day) {
            streak += 1;
        } else if is_due(day, recurrence) {
            return StreakReport { streak, due_today, completed_today, capped: false };
        }

        cursor = day.previous();
    }

    tracing::debug!(
        "Streak walk reached the {}-day lookback cap with streak {}",
        MAX_LOOKBACK_DAYS,
        streak
    );

    StreakReport {
        streak,
        due_today,
        completed_today,
        capped: true,
    }
}
