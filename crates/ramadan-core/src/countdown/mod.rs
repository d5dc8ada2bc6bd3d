//! Countdown & crossing engine.
//!
//! The engine is driven by an explicit local clock: hosts call
//! [`CountdownEngine::tick`] at a fixed cadence (nominally once per second)
//! and receive a [`CountdownSnapshot`]. Nothing in this module reads the
//! system clock.

mod anchor;
mod engine;
mod snapshot;
mod tracker;

pub use anchor::AnchorEvent;
pub use engine::CountdownEngine;
pub use snapshot::{format_hms, AnchorCountdown, CountdownSnapshot};
pub use tracker::CrossingTracker;

use chrono::{Duration, NaiveDateTime};

use crate::schedule::TimeOfDay;

/// Next instant at or after `now` whose time of day is `time`.
///
/// Uses `now`'s date, rolling to the following day only when that instant
/// is strictly in the past. An exact match yields `now` itself.
pub fn next_occurrence(time: TimeOfDay, now: NaiveDateTime) -> NaiveDateTime {
    let candidate = time.on(now.date());
    if candidate < now {
        candidate + Duration::days(1)
    } else {
        candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn later_today_stays_today() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let next = next_occurrence(TimeOfDay::new(18, 30).unwrap(), now);
        assert_eq!(next.date(), now.date());
    }

    #[test]
    fn passed_time_rolls_to_tomorrow() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap().and_hms_opt(18, 31, 0).unwrap();
        let next = next_occurrence(TimeOfDay::new(18, 30).unwrap(), now);
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 4, 1).unwrap().and_hms_opt(18, 30, 0).unwrap());
    }

    #[test]
    fn exact_instant_is_not_rolled() {
        let now = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(4, 45, 0).unwrap();
        assert_eq!(next_occurrence(TimeOfDay::new(4, 45).unwrap(), now), now);
    }
}
