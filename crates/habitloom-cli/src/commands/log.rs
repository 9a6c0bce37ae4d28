//! Completion log commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use habitloom_core::{Database, HabitTracker};

#[derive(Subcommand)]
pub enum LogAction {
    /// Add a log entry for a habit
    Add {
        /// Habit ID
        habit_id: String,
        /// Event date (RFC 3339, defaults to now)
        #[arg(long)]
        date: Option<String>,
        /// Record an explicit miss instead of a completion
        #[arg(long)]
        miss: bool,
    },
    /// List a habit's log entries, newest first
    List {
        /// Habit ID
        habit_id: String,
    },
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        LogAction::Add {
            habit_id,
            date,
            miss,
        } => {
            let date = match date {
                Some(raw) => DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| format!("invalid --date {raw:?}: {e}"))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let tracker = HabitTracker::new(&db);
            let outcome = tracker.record(&habit_id, !miss, date)?;
            if outcome.recorded {
                println!("Log added. Streak: {}", outcome.streak);
            } else {
                println!(
                    "Period already completed, log ignored. Streak: {}",
                    outcome.streak
                );
            }
        }
        LogAction::List { habit_id } => {
            let logs = db.list_logs(&habit_id)?;
            println!("{}", serde_json::to_string_pretty(&logs)?);
        }
    }
    Ok(())
}
