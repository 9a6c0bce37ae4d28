//! Tracker facade wiring the pure streak engine to storage.
//!
//! [`HabitTracker`] fetches a habit's frequency and completion history
//! from the [`Database`](crate::storage::Database), hands them to the
//! pure functions in [`streak`](crate::streak), and persists the
//! resulting completion events. "Now" is always a parameter, so every
//! method is reproducible in tests.
//!
//! Error policy differs deliberately between the two reads:
//! - `can_complete` gates a write, so it fails loud: missing habits and
//!   storage failures surface as errors.
//! - `streak` is advisory display data, so it fails quiet: any lookup
//!   failure degrades to `0` rather than breaking a habit listing.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{CoreError, Result, ValidationError};
use crate::habit::Frequency;
use crate::storage::Database;
use crate::streak;

/// Result of a completion attempt.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionOutcome {
    /// Whether a new completion event was recorded. `false` means the
    /// period already held a completion and the insert was a no-op.
    pub recorded: bool,
    /// The streak after the attempt.
    pub streak: u32,
    /// Start of the period the attempt applied to.
    pub period_start: DateTime<Utc>,
}

/// Facade over a [`Database`] for completion checks, completion
/// recording, and streak computation.
pub struct HabitTracker<'a> {
    db: &'a Database,
}

impl<'a> HabitTracker<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Whether the habit may still be completed in the period
    /// containing `now`.
    ///
    /// # Errors
    /// Returns [`CoreError::HabitNotFound`] if no habit has this id.
    /// A habit whose stored frequency token is unrecognized is treated
    /// as not completable.
    pub fn can_complete(&self, habit_id: &str, now: DateTime<Utc>) -> Result<bool> {
        let frequency = match self.frequency_of(habit_id)? {
            Some(frequency) => frequency,
            None => return Ok(false),
        };
        let dates = self.db.completion_dates(habit_id)?;
        Ok(streak::can_complete(
            frequency,
            dates.into_iter().map(|d| (d, true)),
            now,
        ))
    }

    /// The consecutive-period completion streak as of `now`.
    ///
    /// Never errors: a missing habit, an unrecognized frequency, or a
    /// corrupt log row all yield `0`.
    pub fn streak(&self, habit_id: &str, now: DateTime<Utc>) -> u32 {
        self.try_streak(habit_id, now).unwrap_or(0)
    }

    fn try_streak(&self, habit_id: &str, now: DateTime<Utc>) -> Result<u32> {
        let frequency = match self.frequency_of(habit_id)? {
            Some(frequency) => frequency,
            None => return Ok(0),
        };
        let dates = self.db.completion_dates(habit_id)?;
        Ok(streak::streak(
            frequency,
            dates.into_iter().map(|d| (d, true)),
            now,
        ))
    }

    /// Attempt to record a completion for the period containing `now`.
    ///
    /// The insert is guarded by the database's unique completion index,
    /// so the gate check and the write cannot race: of two concurrent
    /// attempts in one period, exactly one observes `recorded == true`.
    ///
    /// # Errors
    /// Returns [`CoreError::HabitNotFound`] if no habit has this id and
    /// a validation error if the stored frequency token is unrecognized.
    pub fn complete(&self, habit_id: &str, now: DateTime<Utc>) -> Result<CompletionOutcome> {
        self.record(habit_id, true, now)
    }

    /// Record a log entry (completion or explicit miss) dated `date`.
    ///
    /// Backdated completions participate in streaks like any other
    /// event; the period key is derived from `date`, not from the wall
    /// clock at insert time.
    pub fn record(
        &self,
        habit_id: &str,
        status: bool,
        date: DateTime<Utc>,
    ) -> Result<CompletionOutcome> {
        let frequency = self.frequency_of(habit_id)?.ok_or_else(|| {
            ValidationError::UnrecognizedFrequency(
                self.raw_frequency(habit_id).unwrap_or_default(),
            )
        })?;

        let period_start = streak::period_start(frequency, date);
        let recorded = self.db.insert_log(habit_id, status, date, period_start)?;
        Ok(CompletionOutcome {
            recorded,
            streak: self.streak(habit_id, date),
            period_start,
        })
    }

    /// Look up a habit's frequency. `Err(HabitNotFound)` if the habit
    /// is missing, `Ok(None)` if its stored token is unrecognized.
    fn frequency_of(&self, habit_id: &str) -> Result<Option<Frequency>> {
        let raw = self
            .db
            .habit_frequency(habit_id)?
            .ok_or_else(|| CoreError::HabitNotFound {
                id: habit_id.to_string(),
            })?;
        Ok(Frequency::parse(&raw))
    }

    fn raw_frequency(&self, habit_id: &str) -> Option<String> {
        self.db.habit_frequency(habit_id).ok().flatten()
    }
}
