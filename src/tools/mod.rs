/// MCP tools for habit management
///
/// Each tool is a plain function over a `HabitStorage` so it can be called
/// from the MCP server or directly from tests. Tools that depend on the
/// current time take `now` explicitly.

pub mod create;
pub mod reevaluate;
pub mod status;
pub mod toggle;
pub mod update;

// Re-export tool functions for easy access
pub use create::*;
pub use reevaluate::*;
pub use status::*;
pub use toggle::*;
pub use update::*;

use crate::domain::HabitId;
use crate::storage::StorageError;

/// Parse a habit ID argument, reporting blank or malformed IDs as invalid input
pub(crate) fn parse_habit_id(raw: &str) -> Result<HabitId, StorageError> {
    if raw.trim().is_empty() {
        return Err(StorageError::InvalidInput("Habit ID cannot be empty".to_string()));
    }

    HabitId::parse(raw)
        .map_err(|_| StorageError::InvalidInput(format!("Invalid habit ID format: '{}'", raw)))
}
