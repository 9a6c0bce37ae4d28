//! Habit management commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use habitloom_core::{Config, Database, Frequency, Habit, HabitTracker};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a new habit
    Create {
        /// Habit title
        title: String,
        /// Habit description
        #[arg(long, default_value = "")]
        description: String,
        /// Recurrence frequency: daily, weekly, or monthly
        #[arg(long)]
        frequency: Option<String>,
        /// Owning user name (defaults to the configured active user)
        #[arg(long)]
        user: Option<String>,
    },
    /// List habits with their current streaks
    List {
        /// Filter by user name
        #[arg(long)]
        user: Option<String>,
        /// List habits of all users
        #[arg(long)]
        all: bool,
    },
    /// Get habit details
    Get {
        /// Habit ID
        id: String,
    },
    /// Delete a habit and its logs
    Delete {
        /// Habit ID
        id: String,
    },
    /// Mark a habit completed for the current period
    Complete {
        /// Habit ID
        id: String,
    },
    /// Check whether a habit can still be completed this period
    Status {
        /// Habit ID
        id: String,
    },
    /// Show a habit's current streak
    Streak {
        /// Habit ID
        id: String,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        HabitAction::Create {
            title,
            description,
            frequency,
            user,
        } => {
            let user = super::resolve_user(&db, user, &config)?;
            let frequency = match frequency {
                Some(raw) => raw.parse::<Frequency>()?,
                None => config.default_frequency,
            };
            let habit = Habit::new(&user.id, title, description, frequency)?;
            db.create_habit(&habit)?;
            println!("Habit created: {}", habit.id);
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::List { user, all } => {
            let tracker = HabitTracker::new(&db);
            let now = Utc::now();
            let habits = if all {
                db.list_habits(None)?
            } else {
                let user = super::resolve_user(&db, user, &config)?;
                db.list_habits(Some(&user.id))?
            };
            let listed: Vec<_> = habits
                .into_iter()
                .map(|habit| {
                    let streak = tracker.streak(&habit.id, now);
                    let completable = tracker.can_complete(&habit.id, now).unwrap_or(false);
                    serde_json::json!({
                        "id": habit.id,
                        "title": habit.title,
                        "frequency": habit.frequency,
                        "streak": streak,
                        "can_complete": completable,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        HabitAction::Get { id } => {
            let habit = db
                .get_habit(&id)?
                .ok_or_else(|| format!("Habit not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(&habit)?);
        }
        HabitAction::Delete { id } => {
            if db.delete_habit(&id)? {
                println!("Habit deleted: {id}");
            } else {
                return Err(format!("Habit not found: {id}").into());
            }
        }
        HabitAction::Complete { id } => {
            let tracker = HabitTracker::new(&db);
            let outcome = tracker.complete(&id, Utc::now())?;
            if outcome.recorded {
                println!("Completed. Streak: {}", outcome.streak);
            } else {
                println!("Already completed this period. Streak: {}", outcome.streak);
            }
        }
        HabitAction::Status { id } => {
            let tracker = HabitTracker::new(&db);
            let can_complete = tracker.can_complete(&id, Utc::now())?;
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "habit_id": id,
                    "can_complete": can_complete,
                }))?
            );
        }
        HabitAction::Streak { id } => {
            let tracker = HabitTracker::new(&db);
            println!("{}", tracker.streak(&id, Utc::now()));
        }
    }
    Ok(())
}
