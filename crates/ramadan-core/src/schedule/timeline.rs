//! Position of the current instant within the day's prayers.
//!
//! Used by renderers to highlight the upcoming prayer and draw a progress
//! bar between the previous and next one. Spans crossing midnight are
//! computed on real instants, so the bar never runs backwards after Isha.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{Prayer, PrayerSchedule, TimeOfDay};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePosition {
    pub previous: Prayer,
    pub previous_at: NaiveDateTime,
    pub next: Prayer,
    pub next_at: NaiveDateTime,
    /// 0.0 .. 100.0 elapsed between `previous_at` and `next_at`.
    pub progress_pct: f64,
}

impl TimelinePosition {
    pub fn remaining(&self, now: NaiveDateTime) -> Duration {
        (self.next_at - now).max(Duration::zero())
    }
}

pub struct PrayerTimeline;

impl PrayerTimeline {
    /// Locate `now` among the schedule's prayers.
    ///
    /// `next` is the first prayer strictly after `now`'s minute, rolling to
    /// tomorrow's first prayer once the last one has passed. Returns `None`
    /// for an empty schedule.
    pub fn at(schedule: &PrayerSchedule, now: NaiveDateTime) -> Option<TimelinePosition> {
        let entries: Vec<(Prayer, TimeOfDay)> = schedule.iter().collect();
        let (first, last) = (*entries.first()?, *entries.last()?);

        let today = now.date();
        let now_minutes = now.hour() * 60 + now.minute();
        let next_idx = entries
            .iter()
            .position(|(_, t)| t.minutes_of_day() > now_minutes);

        let ((previous, previous_at), (next, next_at)) = match next_idx {
            Some(0) => {
                let yesterday = today - Duration::days(1);
                ((last.0, last.1.on(yesterday)), (first.0, first.1.on(today)))
            }
            Some(idx) => {
                let (pp, pt) = entries[idx - 1];
                let (np, nt) = entries[idx];
                ((pp, pt.on(today)), (np, nt.on(today)))
            }
            None => {
                let tomorrow = today + Duration::days(1);
                ((last.0, last.1.on(today)), (first.0, first.1.on(tomorrow)))
            }
        };

        let total = (next_at - previous_at).num_milliseconds();
        let elapsed = (now - previous_at).num_milliseconds();
        let progress_pct = if total <= 0 {
            100.0
        } else {
            (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };

        Some(TimelinePosition {
            previous,
            previous_at,
            next,
            next_at,
            progress_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixtures::mecca;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn midday_sits_between_dhuhr_and_asr() {
        let pos = PrayerTimeline::at(&mecca(), at(14, 0)).unwrap();
        assert_eq!(pos.previous, Prayer::Dhuhr);
        assert_eq!(pos.next, Prayer::Asr);
        assert!(pos.progress_pct > 0.0 && pos.progress_pct < 100.0);
    }

    #[test]
    fn exact_prayer_minute_points_at_the_following_prayer() {
        let pos = PrayerTimeline::at(&mecca(), at(18, 30)).unwrap();
        assert_eq!(pos.previous, Prayer::Maghrib);
        assert_eq!(pos.next, Prayer::Isha);
        assert_eq!(pos.progress_pct, 0.0);
    }

    #[test]
    fn after_isha_rolls_to_tomorrows_fajr() {
        let pos = PrayerTimeline::at(&mecca(), at(23, 0)).unwrap();
        assert_eq!(pos.previous, Prayer::Isha);
        assert_eq!(pos.next, Prayer::Fajr);
        assert_eq!(pos.next_at.date(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert!(pos.progress_pct > 0.0 && pos.progress_pct < 100.0);
    }

    #[test]
    fn before_fajr_measures_from_yesterdays_isha() {
        let pos = PrayerTimeline::at(&mecca(), at(2, 0)).unwrap();
        assert_eq!(pos.previous, Prayer::Isha);
        assert_eq!(pos.previous_at.date(), NaiveDate::from_ymd_opt(2026, 2, 28).unwrap());
        assert_eq!(pos.next, Prayer::Fajr);
        // 20:00 -> 04:45 is 525 minutes, 360 of them elapsed.
        assert!((pos.progress_pct - 360.0 / 525.0 * 100.0).abs() < 1e-9);
        assert_eq!(pos.remaining(at(2, 0)), Duration::minutes(165));
    }

    #[test]
    fn empty_schedule_has_no_position() {
        assert!(PrayerTimeline::at(&PrayerSchedule::new(), at(12, 0)).is_none());
    }
}
