/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};

use crate::domain::{resolve_timezone, Habit, WeekdayTag};
use crate::storage::{HabitStorage, StorageError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    /// Weekday names the habit is due on
    #[serde(default)]
    pub frequency: Vec<String>,
    /// IANA timezone name, defaults to UTC
    pub timezone: Option<String>,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: Option<String>,
    pub message: String,
}

/// Create a new habit using the provided storage
///
/// Unknown weekday names and timezones are accepted; the response notes
/// what was ignored so the user can correct it.
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, StorageError> {
    let habit = Habit::new(
        params.name,
        params.frequency,
        params.timezone.unwrap_or_default(),
    )?;

    storage.create_habit(&habit)?;

    let recurrence = habit.recurrence();
    let mut message = format!(
        "✅ Created habit '{}' (due: {})",
        habit.name,
        recurrence.describe()
    );

    let ignored: Vec<&str> = habit
        .frequency
        .iter()
        .map(String::as_str)
        .filter(|token| WeekdayTag::parse(token).is_none())
        .collect();
    if !ignored.is_empty() {
        message.push_str(&format!("\n⚠️ Ignored unrecognized days: {}", ignored.join(", ")));
    }

    if !habit.user_timezone.is_empty() && resolve_timezone(&habit.user_timezone).fell_back {
        tracing::warn!(
            "Habit {} created with unknown timezone '{}', UTC will be used",
            habit.id,
            habit.user_timezone
        );
        message.push_str(&format!(
            "\n⚠️ Unknown timezone '{}', days will be counted in UTC",
            habit.user_timezone
        ));
    }

    Ok(CreateHabitResponse {
        success: true,
        habit_id: Some(habit.id.to_string()),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HabitId;
    use crate::storage::SqliteStorage;

    #[test]
    fn test_create_habit_stores_raw_frequency() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = CreateHabitParams {
            name: "Swim".to_string(),
            frequency: vec!["Tuesday".to_string(), "thursday".to_string()],
            timezone: Some("Australia/Sydney".to_string()),
        };

        let response = create_habit(&storage, params).unwrap();
        assert!(response.success);
        assert!(response.message.contains("tuesday, thursday"));

        let id = HabitId::parse(response.habit_id.as_deref().unwrap()).unwrap();
        let habit = storage.get_habit(&id).unwrap();
        assert_eq!(habit.frequency, vec!["Tuesday".to_string(), "thursday".to_string()]);
        assert_eq!(habit.user_timezone, "Australia/Sydney");
    }

    #[test]
    fn test_create_habit_reports_ignored_input() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = CreateHabitParams {
            name: "Journal".to_string(),
            frequency: vec!["monday".to_string(), "mondey".to_string()],
            timezone: Some("Moon/Base".to_string()),
        };

        let response = create_habit(&storage, params).unwrap();
        assert!(response.message.contains("mondey"));
        assert!(response.message.contains("Moon/Base"));
    }

    #[test]
    fn test_create_habit_rejects_empty_name() {
        let storage = SqliteStorage::in_memory().unwrap();
        let params = CreateHabitParams {
            name: " ".to_string(),
            frequency: vec![],
            timezone: None,
        };

        assert!(matches!(
            create_habit(&storage, params),
            Err(StorageError::Domain(_))
        ));
    }
}
