/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// habits and their completion instants. It handles all SQL queries and
/// conversion between rows and domain types.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, Row};

use crate::domain::{Habit, HabitId};
use crate::storage::{migrations, HabitStorage, StorageError};

const HABIT_COLUMNS: &str =
    "id, name, frequency, user_timezone, streak, created_at, is_active";

/// SQLite-based storage implementation
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring its schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::from_connection(conn, &db_path.display().to_string())
    }

    /// In-memory database, used by tests and throwaway sessions
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::from_connection(conn, ":memory:")
    }

    fn from_connection(conn: Connection, label: &str) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {}", label);

        Ok(Self { conn })
    }

    /// Completion instants are stored in one fixed RFC 3339 layout so rows can
    /// be matched by string equality
    fn format_instant(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn conversion_error(column: usize, message: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(column, message.to_string(), rusqlite::types::Type::Text)
    }

    /// Map a `habits` row to a Habit without its completions
    fn habit_from_row(row: &Row<'_>) -> rusqlite::Result<Habit> {
        let id_str: String = row.get(0)?;
        let id = HabitId::parse(&id_str).map_err(|_| Self::conversion_error(0, "Invalid UUID"))?;

        let frequency_json: String = row.get(2)?;
        let frequency: Vec<String> = serde_json::from_str(&frequency_json)
            .map_err(|_| Self::conversion_error(2, "Invalid frequency"))?;

        let created_at_str: String = row.get(5)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|_| Self::conversion_error(5, "Invalid datetime"))?
            .with_timezone(&Utc);

        Ok(Habit::from_existing(
            id,
            row.get(1)?, // name
            frequency,
            row.get(3)?, // user_timezone
            Vec::new(),
            row.get(4)?, // streak
            created_at,
            row.get(6)?, // is_active
        ))
    }

    fn load_completions(&self, habit_id: &HabitId) -> Result<Vec<DateTime<Utc>>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_at FROM habit_completions WHERE habit_id = ?1 ORDER BY completed_at",
        )?;

        let rows = stmt.query_map(params![habit_id.to_string()], |row| row.get::<_, String>(0))?;

        let mut completions = Vec::new();
        for raw in rows {
            let raw = raw?;
            match DateTime::parse_from_rfc3339(&raw) {
                Ok(instant) => completions.push(instant.with_timezone(&Utc)),
                Err(e) => tracing::warn!(
                    "Skipping unreadable completion '{}' for habit {}: {}",
                    raw,
                    habit_id,
                    e
                ),
            }
        }

        Ok(completions)
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO habits (
                id, name, frequency, user_timezone, streak, created_at, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                habit.id.to_string(),
                habit.name,
                frequency_json,
                habit.user_timezone,
                habit.streak,
                habit.created_at.to_rfc3339(),
                habit.is_active
            ],
        )?;

        for completed_at in &habit.completed_dates {
            tx.execute(
                "INSERT INTO habit_completions (habit_id, completed_at) VALUES (?1, ?2)",
                params![habit.id.to_string(), Self::format_instant(completed_at)],
            )?;
        }
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habits WHERE id = ?1", HABIT_COLUMNS);
        let result = self
            .conn
            .query_row(&sql, params![habit_id.to_string()], Self::habit_from_row);

        let mut habit = match result {
            Ok(habit) => habit,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                });
            }
            Err(e) => return Err(StorageError::Query(e)),
        };

        habit.completed_dates = self.load_completions(habit_id)?;
        Ok(habit)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let frequency_json = serde_json::to_string(&habit.frequency)?;

        let rows_affected = self.conn.execute(
            "UPDATE habits SET
                name = ?2,
                frequency = ?3,
                user_timezone = ?4,
                is_active = ?5
             WHERE id = ?1",
            params![
                habit.id.to_string(),
                habit.name,
                frequency_json,
                habit.user_timezone,
                habit.is_active
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET is_active = 0 WHERE id = ?1",
            params![habit_id.to_string()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Soft deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self, active_only: bool) -> Result<Vec<Habit>, StorageError> {
        let mut sql = format!("SELECT {} FROM habits", HABIT_COLUMNS);
        if active_only {
            sql.push_str(" WHERE is_active = 1");
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let habit_iter = stmt.query_map([], Self::habit_from_row)?;

        let mut habits = Vec::new();
        for habit in habit_iter {
            let mut habit = habit?;
            habit.completed_dates = self.load_completions(&habit.id)?;
            habits.push(habit);
        }

        Ok(habits)
    }

    fn add_completion(
        &self,
        habit_id: &HabitId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let result = self.conn.execute(
            "INSERT INTO habit_completions (habit_id, completed_at) VALUES (?1, ?2)",
            params![habit_id.to_string(), Self::format_instant(&completed_at)],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Recorded completion at {} for habit {}", completed_at, habit_id);
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::HabitNotFound {
                    habit_id: habit_id.to_string(),
                })
            }
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn remove_completions(
        &self,
        habit_id: &HabitId,
        completed_at: &[DateTime<Utc>],
    ) -> Result<usize, StorageError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;

        for instant in completed_at {
            removed += tx.execute(
                "DELETE FROM habit_completions WHERE habit_id = ?1 AND completed_at = ?2",
                params![habit_id.to_string(), Self::format_instant(instant)],
            )?;
        }
        tx.commit()?;

        tracing::debug!("Removed {} completion(s) for habit {}", removed, habit_id);
        Ok(removed)
    }

    fn update_streak(&self, habit_id: &HabitId, streak: u32) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET streak = ?2 WHERE id = ?1",
            params![habit_id.to_string(), streak],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }

        tracing::debug!("Updated streak for habit {}: {}", habit_id, streak);
        Ok(())
    }
}
