/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. The streak
/// engine never touches storage; tools load a habit, evaluate it, and write
/// the derived streak back through this interface.

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::{DomainError, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Completions are stored as individual instants; grouping them into
/// calendar days is the domain layer's job.
pub trait HabitStorage {
    /// Create a new habit, including any completions it already carries
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID together with its completions
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Update name, frequency, timezone and active flag
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit (soft delete - mark as inactive)
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List habits, optionally only the active ones
    fn list_habits(&self, active_only: bool) -> Result<Vec<Habit>, StorageError>;

    /// Record one completion instant
    fn add_completion(
        &self,
        habit_id: &HabitId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Remove the given completion instants, returns how many rows went away
    fn remove_completions(
        &self,
        habit_id: &HabitId,
        completed_at: &[DateTime<Utc>],
    ) -> Result<usize, StorageError>;

    /// Persist a derived streak value
    fn update_streak(&self, habit_id: &HabitId, streak: u32) -> Result<(), StorageError>;
}
