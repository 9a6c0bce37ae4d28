//! Habit domain types.
//!
//! A [`Habit`] is a tracked behavior with a recurrence [`Frequency`];
//! a [`CompletionEvent`] is one immutable record of marking it done
//! (or explicitly missed) on a given date. Whether a habit is "done for
//! the current period" is never stored -- it is recomputed from the
//! event history by the [`streak`](crate::streak) module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ValidationError;

/// Maximum length of a habit title.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum length of a habit description.
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Recurrence frequency of a habit.
///
/// Parsed case-insensitively; rendered and stored lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// Parse a frequency token leniently, returning `None` for anything
    /// outside the recognized set. Used where a raw stored token must
    /// not abort the caller (e.g. streak display of a hand-edited row).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(Frequency::Daily),
            "weekly" => Some(Frequency::Weekly),
            "monthly" => Some(Frequency::Monthly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::parse(s).ok_or_else(|| ValidationError::UnrecognizedFrequency(s.to_string()))
    }
}

/// A user profile that owns habits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".to_string(),
                message: "name is required".to_string(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            created_at: Utc::now(),
        })
    }
}

/// A tracked behavior with a recurrence frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub frequency: Frequency,
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit, validating title and description limits.
    pub fn new(
        user_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        frequency: Frequency,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let description = description.into();

        if title.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: "title is required".to_string(),
            });
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::InvalidValue {
                field: "title".to_string(),
                message: format!("title must be {MAX_TITLE_LEN} characters or less"),
            });
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::InvalidValue {
                field: "description".to_string(),
                message: format!("description must be {MAX_DESCRIPTION_LEN} characters or less"),
            });
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            title,
            description,
            frequency,
            created_at: Utc::now(),
        })
    }
}

/// One immutable record of an attempt to mark a habit complete.
///
/// `status == true` means the attempt counts as a completion; a `false`
/// row records an explicit miss and never contributes to a streak.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionEvent {
    pub id: i64,
    pub habit_id: String,
    pub status: bool,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_parse_is_case_insensitive() {
        assert_eq!(Frequency::parse("Daily"), Some(Frequency::Daily));
        assert_eq!(Frequency::parse("WEEKLY"), Some(Frequency::Weekly));
        assert_eq!(Frequency::parse(" monthly "), Some(Frequency::Monthly));
        assert_eq!(Frequency::parse("fortnightly"), None);
        assert_eq!(Frequency::parse(""), None);
    }

    #[test]
    fn frequency_from_str_rejects_unknown_tokens() {
        let err = "FORTNIGHTLY".parse::<Frequency>().unwrap_err();
        assert!(matches!(err, ValidationError::UnrecognizedFrequency(_)));
    }

    #[test]
    fn frequency_serializes_lowercase() {
        let json = serde_json::to_string(&Frequency::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
        let back: Frequency = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(back, Frequency::Monthly);
    }

    #[test]
    fn habit_new_validates_title() {
        assert!(Habit::new("u1", "", "", Frequency::Daily).is_err());
        assert!(Habit::new("u1", "   ", "", Frequency::Daily).is_err());
        assert!(Habit::new("u1", "a".repeat(201), "", Frequency::Daily).is_err());
        assert!(Habit::new("u1", "a".repeat(200), "", Frequency::Daily).is_ok());
    }

    #[test]
    fn habit_new_validates_description() {
        assert!(Habit::new("u1", "Read", "d".repeat(1001), Frequency::Daily).is_err());
        assert!(Habit::new("u1", "Read", "d".repeat(1000), Frequency::Daily).is_ok());
    }

    #[test]
    fn user_new_requires_name() {
        assert!(User::new("").is_err());
        assert!(User::new("alice").is_ok());
    }
}
