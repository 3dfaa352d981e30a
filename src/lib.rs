/// Public library interface for the Habit Streak MCP server
///
/// The core of this crate is the due-date and streak logic in `domain`:
/// calendar-day normalization, the completion ledger, the due-date check
/// and the streak walk. `engine` applies it to stored habits; `storage`,
/// `tools` and the MCP server wrap it into a runnable service.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// Internal modules
mod domain;
mod engine;
mod mcp;
mod storage;
mod tools;

// Re-export public modules and types
pub use domain::*;
pub use engine::{HabitEvaluation, StreakEngine};
pub use storage::{HabitStorage, SqliteStorage, StorageError};
pub use tools::{
    create_habit, get_habit_status, reevaluate_streaks, toggle_completion, update_habit,
    CreateHabitParams, ReevaluateParams, StatusParams, ToggleCompletionParams, UpdateHabitParams,
};

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Habit streak service: storage plus the streak engine, served over MCP
pub struct HabitStreakServer {
    storage: SqliteStorage,
    engine: StreakEngine,
}

impl HabitStreakServer {
    /// Open the database at `db_path`, creating the schema if needed
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Streak server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;
        Ok(Self::with_storage(storage))
    }

    /// Wrap an already-open storage
    pub fn with_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            engine: StreakEngine::new(),
        }
    }

    /// Bring stored streaks up to date, then serve MCP requests on stdin/stdout
    ///
    /// Streaks are re-evaluated again every `reevaluate_every` while running.
    /// Returns when stdin closes.
    pub async fn run(self, reevaluate_every: Duration) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let startup = tools::reevaluate_streaks(
            &self.storage,
            ReevaluateParams::default(),
            chrono::Utc::now(),
        )?;
        tracing::info!(
            "Server started successfully, {} active habits ({} streaks refreshed)",
            startup.evaluated,
            startup.updated
        );

        let mut mcp_server = mcp::McpServer::new(self, reevaluate_every);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the streak engine
    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }
}
