//! # Habitloom Core Library
//!
//! This library provides the core business logic for Habitloom, a
//! CLI-first habit tracker: users create habits with a recurrence
//! frequency (daily, weekly, or monthly) and mark completions; the
//! library answers whether a habit is still completable in the current
//! period and how long its consecutive-period completion streak is.
//!
//! ## Architecture
//!
//! - **Streak Engine**: pure, UTC-normalized period and streak math
//!   over a habit's completion history; "now" is always an injected
//!   parameter, never read from the wall clock inside the computation
//! - **Storage**: SQLite-based habit and log storage plus TOML-based
//!   configuration
//! - **Tracker**: the facade wiring storage to the engine, including
//!   the uniqueness-guarded completion insert
//!
//! ## Key Components
//!
//! - [`streak`]: period boundaries, the can-complete gate, the streak counter
//! - [`HabitTracker`]: storage-backed completion checks and recording
//! - [`Database`]: habit, user, and log persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod habit;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use habit::{CompletionEvent, Frequency, Habit, User};
pub use storage::{Config, Database};
pub use streak::Period;
pub use tracker::{CompletionOutcome, HabitTracker};
