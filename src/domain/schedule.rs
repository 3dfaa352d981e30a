/// Due-date checks against a weekly recurrence rule

use crate::domain::{CalendarDay, RecurrenceRule};

/// Whether a habit with this recurrence is due on `day`
///
/// An empty rule is never due.
pub fn is_due(day: CalendarDay, recurrence: &RecurrenceRule) -> bool {
    recurrence.contains(day.weekday())
}
