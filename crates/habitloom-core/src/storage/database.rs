//! SQLite-based habit storage.
//!
//! Provides persistent storage for:
//! - User profiles
//! - Habits and their recurrence frequency
//! - Completion logs (the immutable event history streaks are computed from)
//!
//! Deletes cascade: removing a user removes their habits, removing a
//! habit removes its logs. Completion inserts are guarded by a unique
//! index on `(habit_id, period_start)` for `status = 1` rows, so two
//! racing attempts to complete the same period cannot both land.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::DatabaseError;
use crate::habit::{CompletionEvent, Frequency, Habit, User};

use super::data_dir;

/// Parse an RFC 3339 timestamp stored by this module.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::CorruptRow(format!("bad timestamp {s:?}: {e}")))
}

fn parse_frequency(s: &str) -> Result<Frequency, DatabaseError> {
    Frequency::parse(s)
        .ok_or_else(|| DatabaseError::CorruptRow(format!("unrecognized frequency {s:?}")))
}

/// SQLite database for habit storage.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/habitloom/habitloom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let path = data_dir()?.join("habitloom.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habits (
                id          TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title       TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                frequency   TEXT NOT NULL,
                created_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS habit_logs (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                habit_id     TEXT NOT NULL REFERENCES habits(id) ON DELETE CASCADE,
                status       INTEGER NOT NULL,
                date         TEXT NOT NULL,
                period_start TEXT NOT NULL
            );

            -- Create indexes for common query patterns
            CREATE INDEX IF NOT EXISTS idx_habits_user_id ON habits(user_id);
            CREATE INDEX IF NOT EXISTS idx_habit_logs_habit_date ON habit_logs(habit_id, date);

            -- At most one true completion per habit per period.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_habit_logs_completion_period
                ON habit_logs(habit_id, period_start) WHERE status = 1;",
        )?;
        Ok(())
    }

    // === Users ===

    pub fn create_user(&self, user: &User) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO users (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![user.id, user.name, user.created_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn list_users(&self) -> Result<Vec<User>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM users ORDER BY created_at")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut users = Vec::new();
        for row in rows {
            let (id, name, created_at) = row?;
            users.push(User {
                id,
                name,
                created_at: parse_datetime(&created_at)?,
            });
        }
        Ok(users)
    }

    pub fn user_by_name(&self, name: &str) -> Result<Option<User>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, created_at)) => Ok(Some(User {
                id,
                name,
                created_at: parse_datetime(&created_at)?,
            })),
            None => Ok(None),
        }
    }

    /// Delete a user and, via cascade, their habits and logs.
    /// Returns whether a row was deleted.
    pub fn delete_user(&self, id: &str) -> Result<bool, DatabaseError> {
        let n = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    // === Habits ===

    pub fn create_habit(&self, habit: &Habit) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT INTO habits (id, user_id, title, description, frequency, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                habit.id,
                habit.user_id,
                habit.title,
                habit.description,
                habit.frequency.as_str(),
                habit.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    pub fn get_habit(&self, id: &str) -> Result<Option<Habit>, DatabaseError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, user_id, title, description, frequency, created_at
                 FROM habits WHERE id = ?1",
                params![id],
                habit_row,
            )
            .optional()?;

        match row {
            Some(raw) => Ok(Some(habit_from_raw(raw)?)),
            None => Ok(None),
        }
    }

    /// List habits, newest first, optionally scoped to one user.
    pub fn list_habits(&self, user_id: Option<&str>) -> Result<Vec<Habit>, DatabaseError> {
        let mut habits = Vec::new();
        match user_id {
            Some(user_id) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, user_id, title, description, frequency, created_at
                     FROM habits WHERE user_id = ?1 ORDER BY created_at DESC",
                )?;
                let rows = stmt.query_map(params![user_id], habit_row)?;
                for row in rows {
                    habits.push(habit_from_raw(row?)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, user_id, title, description, frequency, created_at
                     FROM habits ORDER BY created_at DESC",
                )?;
                let rows = stmt.query_map([], habit_row)?;
                for row in rows {
                    habits.push(habit_from_raw(row?)?);
                }
            }
        }
        Ok(habits)
    }

    /// Delete a habit and, via cascade, its logs.
    /// Returns whether a row was deleted.
    pub fn delete_habit(&self, id: &str) -> Result<bool, DatabaseError> {
        let n = self
            .conn
            .execute("DELETE FROM habits WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    /// Fetch a habit's raw frequency token, without interpreting it.
    ///
    /// The tracker parses the token leniently so that a hand-edited row
    /// with an unknown frequency degrades instead of failing every read
    /// of the habit.
    pub fn habit_frequency(&self, id: &str) -> Result<Option<String>, DatabaseError> {
        let freq = self
            .conn
            .query_row(
                "SELECT frequency FROM habits WHERE id = ?1",
                params![id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(freq)
    }

    // === Completion logs ===

    /// Insert a completion log entry.
    ///
    /// `period_start` is the period-start key of `date` under the habit's
    /// frequency, computed by the caller. For `status = true` rows the
    /// unique completion index makes the insert a no-op when the period
    /// already holds a completion; the return value reports whether the
    /// row actually landed.
    pub fn insert_log(
        &self,
        habit_id: &str,
        status: bool,
        date: DateTime<Utc>,
        period_start: DateTime<Utc>,
    ) -> Result<bool, DatabaseError> {
        let n = self.conn.execute(
            "INSERT OR IGNORE INTO habit_logs (habit_id, status, date, period_start)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                habit_id,
                status,
                date.to_rfc3339(),
                period_start.to_rfc3339(),
            ],
        )?;
        Ok(n > 0)
    }

    /// All log entries for a habit, newest first.
    pub fn list_logs(&self, habit_id: &str) -> Result<Vec<CompletionEvent>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, status, date FROM habit_logs
             WHERE habit_id = ?1 ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut logs = Vec::new();
        for row in rows {
            let (id, habit_id, status, date) = row?;
            logs.push(CompletionEvent {
                id,
                habit_id,
                status,
                date: parse_datetime(&date)?,
            });
        }
        Ok(logs)
    }

    /// Dates of all `status = true` log entries for a habit, newest first.
    pub fn completion_dates(&self, habit_id: &str) -> Result<Vec<DateTime<Utc>>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT date FROM habit_logs
             WHERE habit_id = ?1 AND status = 1 ORDER BY date DESC",
        )?;
        let rows = stmt.query_map(params![habit_id], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            dates.push(parse_datetime(&row?)?);
        }
        Ok(dates)
    }

}

type RawHabit = (String, String, String, String, String, String);

fn habit_row(row: &rusqlite::Row) -> Result<RawHabit, rusqlite::Error> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, String>(3)?,
        row.get::<_, String>(4)?,
        row.get::<_, String>(5)?,
    ))
}

fn habit_from_raw(raw: RawHabit) -> Result<Habit, DatabaseError> {
    let (id, user_id, title, description, frequency, created_at) = raw;
    Ok(Habit {
        id,
        user_id,
        title,
        description,
        frequency: parse_frequency(&frequency)?,
        created_at: parse_datetime(&created_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::Frequency;
    use chrono::TimeZone;

    fn sample_habit(db: &Database, frequency: Frequency) -> Habit {
        let user = User::new("alice").unwrap();
        db.create_user(&user).unwrap();
        let habit = Habit::new(&user.id, "Read", "20 pages", frequency).unwrap();
        db.create_habit(&habit).unwrap();
        habit
    }

    #[test]
    fn create_and_get_habit() {
        let db = Database::open_memory().unwrap();
        let habit = sample_habit(&db, Frequency::Weekly);

        let fetched = db.get_habit(&habit.id).unwrap().unwrap();
        assert_eq!(fetched.title, "Read");
        assert_eq!(fetched.frequency, Frequency::Weekly);
        assert_eq!(db.habit_frequency(&habit.id).unwrap().unwrap(), "weekly");
        assert!(db.get_habit("missing").unwrap().is_none());
    }

    #[test]
    fn list_habits_scoped_by_user() {
        let db = Database::open_memory().unwrap();
        let habit = sample_habit(&db, Frequency::Daily);

        let bob = User::new("bob").unwrap();
        db.create_user(&bob).unwrap();
        let other = Habit::new(&bob.id, "Run", "", Frequency::Daily).unwrap();
        db.create_habit(&other).unwrap();

        assert_eq!(db.list_habits(None).unwrap().len(), 2);
        let scoped = db.list_habits(Some(&habit.user_id)).unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].id, habit.id);
    }

    #[test]
    fn deleting_user_cascades_to_habits_and_logs() {
        let db = Database::open_memory().unwrap();
        let habit = sample_habit(&db, Frequency::Daily);
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        db.insert_log(&habit.id, true, now, now).unwrap();

        assert!(db.delete_user(&habit.user_id).unwrap());
        assert!(db.get_habit(&habit.id).unwrap().is_none());
        assert!(db.list_logs(&habit.id).unwrap().is_empty());
    }

    #[test]
    fn completion_insert_is_unique_per_period() {
        let db = Database::open_memory().unwrap();
        let habit = sample_habit(&db, Frequency::Daily);
        let key = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

        let morning = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 10, 21, 0, 0).unwrap();
        assert!(db.insert_log(&habit.id, true, morning, key).unwrap());
        assert!(!db.insert_log(&habit.id, true, evening, key).unwrap());

        // Miss rows are not constrained.
        assert!(db.insert_log(&habit.id, false, evening, key).unwrap());
        assert_eq!(db.completion_dates(&habit.id).unwrap(), vec![morning]);
        assert_eq!(db.list_logs(&habit.id).unwrap().len(), 2);
    }

    #[test]
    fn logs_are_returned_newest_first() {
        let db = Database::open_memory().unwrap();
        let habit = sample_habit(&db, Frequency::Daily);
        for day in 10..=12 {
            let date = Utc.with_ymd_and_hms(2024, 1, day, 8, 0, 0).unwrap();
            let key = Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap();
            db.insert_log(&habit.id, true, date, key).unwrap();
        }
        let dates = db.completion_dates(&habit.id).unwrap();
        assert_eq!(dates[0], Utc.with_ymd_and_hms(2024, 1, 12, 8, 0, 0).unwrap());
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitloom.db");

        let habit_id = {
            let db = Database::open_at(&path).unwrap();
            sample_habit(&db, Frequency::Monthly).id
        };

        let db = Database::open_at(&path).unwrap();
        let fetched = db.get_habit(&habit_id).unwrap().unwrap();
        assert_eq!(fetched.frequency, Frequency::Monthly);
    }

    #[test]
    fn duplicate_user_name_is_rejected() {
        let db = Database::open_memory().unwrap();
        let a = User::new("alice").unwrap();
        let b = User::new("alice").unwrap();
        db.create_user(&a).unwrap();
        assert!(db.create_user(&b).is_err());
        assert_eq!(db.user_by_name("alice").unwrap().unwrap().id, a.id);
    }
}
