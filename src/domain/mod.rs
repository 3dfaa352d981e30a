/// Domain module containing the due-date and streak logic
///
/// This module defines the calendar-day normalizer, the completion ledger,
/// the due-date predicate and the streak calculation, plus the Habit record
/// those pieces are evaluated against. Everything here is pure: no I/O, no
/// shared state.

pub mod calendar;
pub mod habit;
pub mod ledger;
pub mod schedule;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use calendar::*;
pub use habit::*;
pub use ledger::*;
pub use schedule::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
