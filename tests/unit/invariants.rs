/// Property tests for the streak rules
use habit_streak_mcp::*;
use proptest::prelude::*;

fn base_day() -> CalendarDay {
    CalendarDay::from_ymd(2025, 3, 3).unwrap()
}

fn days_before(day: CalendarDay, n: u16) -> CalendarDay {
    let mut d = day;
    for _ in 0..n {
        d = d.previous().unwrap();
    }
    d
}

fn rule_from_mask(mask: u8) -> RecurrenceRule {
    WeekdayTag::ALL
        .into_iter()
        .filter(|tag| mask & (1 << tag.index()) != 0)
        .collect()
}

fn ledger_from_offsets(today: CalendarDay, offsets: &[u16]) -> CompletionLedger {
    CompletionLedger::from_days(
        offsets.iter().map(|o| days_before(today, *o)),
        chrono_tz::Tz::UTC,
    )
}

proptest! {
    #[test]
    fn streak_is_deterministic(
        today_shift in 0u16..400,
        mask in 0u8..128,
        offsets in prop::collection::vec(0u16..90, 0..40),
    ) {
        let today = days_before(base_day(), today_shift);
        let rule = rule_from_mask(mask);
        let ledger = ledger_from_offsets(today, &offsets);

        let first = compute_streak_report(today, &rule, &ledger);
        let second = compute_streak_report(today, &rule, &ledger.clone());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn streak_bounded_by_completions(
        mask in 0u8..128,
        offsets in prop::collection::vec(0u16..500, 0..60),
    ) {
        let today = base_day();
        let ledger = ledger_from_offsets(today, &offsets);
        let streak = compute_streak(today, &rule_from_mask(mask), &ledger);

        prop_assert!(streak as usize <= ledger.len());
        if ledger.is_empty() {
            prop_assert_eq!(streak, 0);
        }
    }

    #[test]
    fn due_today_without_completion_is_zero(
        mask in 1u8..128,
        offsets in prop::collection::vec(1u16..90, 0..40),
    ) {
        // force today's weekday into the rule; offsets start at 1 so today is never completed
        let today = base_day();
        let rule: RecurrenceRule = rule_from_mask(mask)
            .iter()
            .chain(std::iter::once(today.weekday()))
            .collect();
        let ledger = ledger_from_offsets(today, &offsets);

        prop_assert!(is_due(today, &rule));
        prop_assert_eq!(compute_streak(today, &rule, &ledger), 0);
    }

    #[test]
    fn bonus_completion_never_lowers_streak(
        mask in 0u8..128,
        offsets in prop::collection::vec(0u16..90, 0..40),
        bonus in 0u16..90,
    ) {
        let today = base_day();
        let rule = rule_from_mask(mask);
        let bonus_day = days_before(today, bonus);
        prop_assume!(!is_due(bonus_day, &rule));

        let without = ledger_from_offsets(today, &offsets);
        let mut with = without.clone();
        with.insert(bonus_day);

        prop_assert!(
            compute_streak(today, &rule, &with) >= compute_streak(today, &rule, &without)
        );
    }
}
