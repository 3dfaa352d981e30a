/// Unit tests for the due-date and streak logic through the public API
mod invariants;
mod streak_scenarios;
