/// Storage, tools and server wiring against a real database file
use chrono::{DateTime, Utc};
use habit_streak_mcp::*;
use tempfile::NamedTempFile;

fn instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

fn create(storage: &SqliteStorage, frequency: &[&str], timezone: &str) -> HabitId {
    let response = create_habit(
        storage,
        CreateHabitParams {
            name: "Workout".to_string(),
            frequency: frequency.iter().map(|s| s.to_string()).collect(),
            timezone: Some(timezone.to_string()),
        },
    )
    .expect("Failed to create habit");

    HabitId::parse(&response.habit_id.expect("missing habit id")).unwrap()
}

fn toggle(storage: &SqliteStorage, habit_id: &HabitId, date: &str, now: DateTime<Utc>) -> u32 {
    toggle_completion(
        storage,
        ToggleCompletionParams {
            habit_id: habit_id.to_string(),
            date: Some(date.to_string()),
        },
        now,
    )
    .expect("Failed to toggle completion")
    .current_streak
}

#[cfg(test)]
mod workflow_tests {
    use super::*;

    #[tokio::test]
    async fn test_server_opens_database_twice() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = temp_file.path().to_path_buf();

        let server = HabitStreakServer::new(db_path.clone())
            .await
            .expect("Failed to create first server");
        let habit_id = create(server.storage(), &["monday"], "UTC");
        drop(server);

        let server = HabitStreakServer::new(db_path)
            .await
            .expect("Failed to create second server");
        let habit = server.storage().get_habit(&habit_id).unwrap();
        assert_eq!(habit.name, "Workout");
    }

    #[test]
    fn test_week_of_toggles_builds_and_breaks_streak() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
        let habit_id = create(&storage, &["Monday", "Wednesday", "Friday"], "America/New_York");

        // Monday 2025-03-03 13:00 in New York
        let monday = instant("2025-03-03T18:00:00Z");
        assert_eq!(toggle(&storage, &habit_id, "2025-02-24", monday), 0);
        assert_eq!(toggle(&storage, &habit_id, "2025-02-26", monday), 0);
        assert_eq!(toggle(&storage, &habit_id, "2025-02-28", monday), 0);
        // due today and done: the whole week counts
        assert_eq!(toggle(&storage, &habit_id, "2025-03-03", monday), 4);

        // Saturday bonus extends it
        assert_eq!(toggle(&storage, &habit_id, "2025-03-01", monday), 5);

        // Wednesday comes and goes without a completion
        let thursday = instant("2025-03-06T18:00:00Z");
        let response = reevaluate_streaks(&storage, ReevaluateParams::default(), thursday).unwrap();
        assert_eq!(response.updated, 1);
        assert_eq!(storage.get_habit(&habit_id).unwrap().streak, 0);

        // Undo the Wednesday miss after the fact
        assert_eq!(toggle(&storage, &habit_id, "2025-03-05", thursday), 6);
    }

    #[test]
    fn test_status_is_consistent_with_is_completed_for_date() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
        let habit_id = create(&storage, &["sunday"], "America/Chicago");

        let late_sunday = "2025-03-02T23:30:00Z";
        let now = instant("2025-03-03T01:00:00Z"); // still Sunday evening in Chicago
        assert_eq!(toggle(&storage, &habit_id, late_sunday, now), 1);

        let habit = storage.get_habit(&habit_id).unwrap();
        assert!(habit.is_completed_for_date(instant("2025-03-02T15:00:00Z")));
        assert!(!habit.is_completed_for_date(instant("2025-03-03T15:00:00Z")));

        let status = get_habit_status(
            &storage,
            StatusParams { habit_id: Some(habit_id.to_string()) },
            now,
        )
        .unwrap();
        let habit_status = &status.habits[0];
        assert_eq!(habit_status.today, "2025-03-02");
        assert!(habit_status.due_today);
        assert!(habit_status.completed_today);
        assert_eq!(habit_status.current_streak, 1);
    }

    #[test]
    fn test_timezone_change_moves_completion_days() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf()).unwrap();
        let habit_id = create(&storage, &["monday"], "UTC");

        // 23:30 UTC Sunday; in Tokyo this is Monday morning
        let now = instant("2025-03-03T03:00:00Z");
        assert_eq!(toggle(&storage, &habit_id, "2025-03-02T23:30:00Z", now), 0);

        let response = update_habit(
            &storage,
            UpdateHabitParams {
                habit_id: habit_id.to_string(),
                name: None,
                frequency: None,
                timezone: Some("Asia/Tokyo".to_string()),
                is_active: None,
            },
            now,
        )
        .unwrap();
        assert_eq!(response.current_streak, 1);
    }
}
