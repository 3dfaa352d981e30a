/// Worked streak scenarios on concrete calendars
use chrono::{DateTime, Utc};
use habit_streak_mcp::*;

fn day(y: i32, m: u32, d: u32) -> CalendarDay {
    CalendarDay::from_ymd(y, m, d).unwrap()
}

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn ledger(days: &[CalendarDay]) -> CompletionLedger {
    CompletionLedger::from_days(days.iter().copied(), chrono_tz::Tz::UTC)
}

fn mwf() -> RecurrenceRule {
    RecurrenceRule::from_frequency(["monday", "wednesday", "friday"])
}

#[cfg(test)]
mod streak_scenario_tests {
    use super::*;

    #[test]
    fn test_five_consecutive_due_days() {
        let today = day(2025, 3, 3);
        let completions = [
            day(2025, 3, 3),
            day(2025, 2, 28),
            day(2025, 2, 26),
            day(2025, 2, 24),
            day(2025, 2, 21),
        ];

        assert_eq!(compute_streak(today, &mwf(), &ledger(&completions)), 5);
    }

    #[test]
    fn test_missed_wednesday_stops_walk() {
        let today = day(2025, 3, 3);
        let completions = [day(2025, 3, 3), day(2025, 2, 28)];

        assert_eq!(compute_streak(today, &mwf(), &ledger(&completions)), 2);
    }

    #[test]
    fn test_due_today_not_done_is_zero() {
        let today = day(2025, 3, 3);
        let mondays = RecurrenceRule::from_frequency(["Monday"]);
        let completions = [day(2025, 2, 24), day(2025, 2, 17)];

        let report = compute_streak_report(today, &mondays, &ledger(&completions));
        assert_eq!(report.streak, 0);
        assert!(report.due_today);
        assert!(!report.completed_today);
    }

    #[test]
    fn test_every_day_stops_at_missing_friday() {
        let today = day(2025, 3, 3);
        let completions = [
            day(2025, 3, 3),
            day(2025, 3, 2),
            day(2025, 3, 1),
            day(2025, 2, 27),
            day(2025, 2, 26),
        ];

        assert_eq!(
            compute_streak(today, &RecurrenceRule::every_day(), &ledger(&completions)),
            3
        );
    }

    #[test]
    fn test_empty_recurrence_counts_only_bonus_days() {
        let today = day(2025, 3, 3);
        let never = RecurrenceRule::from_frequency(["", "blursday"]);
        let completions = [day(2025, 3, 1), day(2025, 2, 10), day(2024, 12, 25)];

        let report = compute_streak_report(today, &never, &ledger(&completions));
        assert!(!report.due_today);
        assert_eq!(report.streak, 3);
        // nothing can break the walk, so it runs to the cap
        assert!(report.capped);

        for offset in 0..14 {
            let mut d = today;
            for _ in 0..offset {
                d = d.previous().unwrap();
            }
            assert!(!is_due(d, &never));
        }
    }

    #[test]
    fn test_completion_day_follows_habit_timezone() {
        let ledger = CompletionLedger::build(&[instant("2025-03-02T23:30:00Z")], "America/Chicago");

        assert!(ledger.contains(day(2025, 3, 2)));
        assert!(!ledger.contains(day(2025, 3, 3)));
        assert!(ledger.is_completed_for_date(instant("2025-03-02T12:00:00Z")));
        assert!(!ledger.is_completed_for_date(instant("2025-03-03T12:00:00Z")));
    }

    #[test]
    fn test_habit_record_end_to_end() {
        let mut habit = Habit::new(
            "Piano".to_string(),
            vec!["MONDAY".to_string(), "Wednesday".to_string(), "friday".to_string(), "xyz".to_string()],
            "Asia/Tokyo".to_string(),
        )
        .unwrap();

        // 2025-03-02T16:00Z is 01:00 Monday March 3 in Tokyo
        habit.toggle_completion(instant("2025-03-02T16:00:00Z"));
        // Friday Feb 28, 20:00 Tokyo
        habit.toggle_completion(instant("2025-02-28T11:00:00Z"));

        let now = instant("2025-03-03T03:00:00Z"); // Monday noon in Tokyo
        let evaluation = StreakEngine::new().evaluate(&habit, now);

        assert_eq!(evaluation.today, day(2025, 3, 3));
        assert_eq!(evaluation.report.streak, 2);
        assert_eq!(habit.streak, 0, "evaluate never writes to the record");
    }

    #[test]
    fn test_year_boundary_walk() {
        // Wednesday 2025-01-01, daily habit done Dec 30, Dec 31 and Jan 1
        let today = day(2025, 1, 1);
        let completions = [day(2025, 1, 1), day(2024, 12, 31), day(2024, 12, 30)];

        assert_eq!(
            compute_streak(today, &RecurrenceRule::every_day(), &ledger(&completions)),
            3
        );
    }

    #[test]
    fn test_leap_day_is_its_own_due_date() {
        // 2024-02-29 is a Thursday; Thursday-only habit done on it and the Thursday before
        let thursdays = RecurrenceRule::from_frequency(["thursday"]);
        let today = day(2024, 3, 2);
        let completions = [day(2024, 2, 29), day(2024, 2, 22)];

        assert_eq!(compute_streak(today, &thursdays, &ledger(&completions)), 2);
    }
}
