//! Property tests for period boundary math.
//!
//! Checks the two structural invariants of the engine over arbitrary
//! instants: every period is exactly one frequency unit long and
//! contains its reference instant, and period starts are monotonic in
//! the reference instant.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use habitloom_core::habit::Frequency;
use habitloom_core::streak::{period_start, previous_period_start, streak, Period};
use proptest::prelude::*;

fn any_frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
    ]
}

/// Instants between 1970 and 2100, with second precision.
fn any_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

proptest! {
    #[test]
    fn period_contains_instant_and_spans_one_unit(
        frequency in any_frequency(),
        instant in any_instant(),
    ) {
        let period = Period::containing(frequency, instant);

        prop_assert!(period.start <= instant);
        prop_assert!(instant < period.end);
        prop_assert!(period.contains(instant));

        match frequency {
            Frequency::Daily => {
                prop_assert_eq!(period.end - period.start, Duration::days(1));
            }
            Frequency::Weekly => {
                prop_assert_eq!(period.end - period.start, Duration::days(7));
                // Monday start.
                prop_assert_eq!(period.start.weekday().num_days_from_monday(), 0);
            }
            Frequency::Monthly => {
                prop_assert_eq!(period.start.day(), 1);
                prop_assert_eq!(period.end.day(), 1);
                let months = |d: DateTime<Utc>| d.year() * 12 + d.month() as i32;
                prop_assert_eq!(months(period.end) - months(period.start), 1);
            }
        }
    }

    #[test]
    fn period_start_is_monotonic(
        frequency in any_frequency(),
        a in any_instant(),
        b in any_instant(),
    ) {
        let (t1, t2) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(period_start(frequency, t1) <= period_start(frequency, t2));
    }

    #[test]
    fn previous_period_start_inverts_one_step(
        frequency in any_frequency(),
        instant in any_instant(),
    ) {
        let start = period_start(frequency, instant);
        let prev = previous_period_start(frequency, start);
        prop_assert!(prev < start);
        // The step lands on a valid period-start key.
        prop_assert_eq!(period_start(frequency, prev), prev);
        // And prev's period ends exactly where this one begins.
        prop_assert_eq!(Period::containing(frequency, prev).end, start);
    }

    #[test]
    fn streak_is_insensitive_to_event_order_and_duplication(
        frequency in any_frequency(),
        now in any_instant(),
        dates in prop::collection::vec(any_instant(), 0..20),
    ) {
        let events: Vec<_> = dates.iter().map(|d| (*d, true)).collect();
        let mut reversed = events.clone();
        reversed.reverse();
        let doubled: Vec<_> = events.iter().chain(events.iter()).copied().collect();

        let base = streak(frequency, events, now);
        prop_assert_eq!(streak(frequency, reversed, now), base);
        prop_assert_eq!(streak(frequency, doubled, now), base);
    }
}
