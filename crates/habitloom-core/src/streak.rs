//! Period and streak computation engine.
//!
//! This module is the pure core of the tracker: given a habit's
//! [`Frequency`] and its completion history, it answers two questions:
//! - **can-complete**: is the habit still completable in the current
//!   period, or was it already done?
//! - **streak**: how many consecutive periods, ending at the most
//!   recent eligible one, have at least one completion?
//!
//! All calendar math is UTC-normalized: an event's time-of-day and the
//! caller's local timezone never influence which period it lands in.
//! Periods are half-open `[start, end)` intervals; a day period covers
//! one UTC date, a week starts on Monday, a month starts on the 1st.
//!
//! The functions here take the reference instant ("now") as a
//! parameter and perform no I/O, so every result is reproducible in
//! tests without touching a clock or a database.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::habit::Frequency;

/// A half-open UTC time interval `[start, end)` of length one
/// frequency unit, containing some reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Period {
    /// Compute the period containing `instant` for the given frequency.
    ///
    /// The instant is first normalized to UTC midnight of its date, so
    /// two instants on the same UTC date always map to the same period
    /// regardless of time-of-day.
    pub fn containing(frequency: Frequency, instant: DateTime<Utc>) -> Period {
        let start_date = period_start_date(frequency, instant.date_naive());
        let end_date = match frequency {
            Frequency::Daily => start_date + Duration::days(1),
            Frequency::Weekly => start_date + Duration::days(7),
            Frequency::Monthly => start_date
                .checked_add_months(Months::new(1))
                .unwrap_or(NaiveDate::MAX),
        };
        Period {
            start: midnight_utc(start_date),
            end: midnight_utc(end_date),
        }
    }

    /// Whether `instant` falls inside this period (`start` inclusive,
    /// `end` exclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The period-start key for `instant`: the `start` of the period that
/// contains it. Two events belong to the same period iff their keys
/// are equal, which makes this the deduplication unit for streaks.
pub fn period_start(frequency: Frequency, instant: DateTime<Utc>) -> DateTime<Utc> {
    midnight_utc(period_start_date(frequency, instant.date_naive()))
}

/// The start key of the period immediately preceding the one that
/// starts at `start`.
///
/// Monthly stepping uses calendar month arithmetic, never a fixed
/// number of days, so months of varying length stay aligned.
pub fn previous_period_start(frequency: Frequency, start: DateTime<Utc>) -> DateTime<Utc> {
    let date = start.date_naive();
    let prev = match frequency {
        Frequency::Daily => date - Duration::days(1),
        Frequency::Weekly => date - Duration::days(7),
        Frequency::Monthly => date
            .checked_sub_months(Months::new(1))
            .unwrap_or(NaiveDate::MIN),
    };
    midnight_utc(period_start_date(frequency, prev))
}

/// Whether the habit may still be completed in the period containing
/// `now`: true iff no completion with `status == true` falls inside
/// that period. Existence is binary, so the scan short-circuits on the
/// first hit.
pub fn can_complete<I>(frequency: Frequency, events: I, now: DateTime<Utc>) -> bool
where
    I: IntoIterator<Item = (DateTime<Utc>, bool)>,
{
    let period = Period::containing(frequency, now);
    !events
        .into_iter()
        .any(|(date, status)| status && period.contains(date))
}

/// Count the consecutive-period completion streak ending at the most
/// recent eligible period.
///
/// Events are reduced to period-start keys and deduplicated, so any
/// number of completions inside one period counts once. Keys after the
/// current period are ignored. The streak is active only if the most
/// recent key is the current period or the immediately preceding one
/// (the grace window: a streak does not vanish the instant a period
/// rolls over, before the user has acted). From that anchor the count
/// walks backwards one period at a time until the first gap.
pub fn streak<I>(frequency: Frequency, events: I, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = (DateTime<Utc>, bool)>,
{
    let current = period_start(frequency, now);

    let keys: BTreeSet<DateTime<Utc>> = events
        .into_iter()
        .filter(|(_, status)| *status)
        .map(|(date, _)| period_start(frequency, date))
        .filter(|key| *key <= current)
        .collect();

    let most_recent = match keys.iter().next_back() {
        Some(key) => *key,
        None => return 0,
    };

    if most_recent != current && most_recent != previous_period_start(frequency, current) {
        return 0;
    }

    let mut count = 1u32;
    let mut cursor = most_recent;
    loop {
        let prev = previous_period_start(frequency, cursor);
        if keys.contains(&prev) {
            count += 1;
            cursor = prev;
        } else {
            break;
        }
    }
    count
}

/// UTC midnight of a calendar date.
fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn period_start_date(frequency: Frequency, date: NaiveDate) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        // Weeks start on Monday.
        Frequency::Weekly => date - Duration::days(date.weekday().num_days_from_monday() as i64),
        Frequency::Monthly => date.with_day(1).unwrap_or(date),
    }
}
