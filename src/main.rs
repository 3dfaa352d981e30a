/// Main entry point for the Habit Streak MCP server
///
/// This file sets up logging, parses command line arguments, and starts the
/// MCP server. Requests arrive as JSON-RPC over stdin/stdout, so all logging
/// goes to stderr.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use habit_streak_mcp::HabitStreakServer;

/// Pick a writable directory for the database, trying the usual places in order
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let candidates = [
        dirs::home_dir().map(|p| p.join(".habit_streak")),
        dirs::data_dir().map(|p| p.join("habit_streak")),
        dirs::config_dir().map(|p| p.join("habit_streak")),
        std::env::current_dir().ok().map(|p| p.join(".habit_streak")),
    ];

    for dir in candidates.iter().flatten() {
        if std::fs::create_dir_all(dir).is_err() {
            continue;
        }

        let probe = dir.join(".test_write");
        if std::fs::write(&probe, "test").is_ok() {
            let _ = std::fs::remove_file(&probe);
            return Ok(dir.join("habits.db"));
        }
    }

    let temp_dir = std::env::temp_dir().join("habit_streak");
    std::fs::create_dir_all(&temp_dir)?;
    let db_path = temp_dir.join("habits.db");

    tracing::warn!("Using temporary directory for database: {}", db_path.display());
    Ok(db_path)
}

/// Command line arguments for the Habit Streak MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,

    /// Seconds between background streak re-evaluations
    #[arg(long, default_value_t = 86_400, value_parser = clap::value_parser!(u64).range(1..))]
    reevaluate_interval: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_streak_mcp={}", log_level))
        .with_writer(std::io::stderr) // stdout carries JSON-RPC
        .init();

    info!("Starting Habit Streak MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitStreakServer::new(db_path).await?;
    server
        .run(Duration::from_secs(args.reevaluate_interval))
        .await?;

    info!("Habit Streak MCP server shutdown complete");
    Ok(())
}
