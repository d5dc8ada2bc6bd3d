//! Countdown engine implementation.
//!
//! The engine is a pure function of `(state, now)`. It does not use timers
//! or threads; the caller supplies the local wall clock on every `tick()`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! engine.load_schedule(schedule)?;
//! // In a loop, once per second:
//! let snapshot = engine.tick(Local::now().naive_local());
//! ```
//!
//! `tick` and `load_schedule` take `&mut self`, so calls are serialized by
//! the borrow checker. A multi-threaded host must put the engine behind a
//! mutex.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::snapshot::{AnchorCountdown, CountdownSnapshot};
use super::{next_occurrence, AnchorEvent, CrossingTracker};
use crate::error::ScheduleError;
use crate::schedule::{Prayer, PrayerSchedule};

/// Core countdown engine.
///
/// Serializable so that short-lived hosts can persist crossing state
/// between invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountdownEngine {
    schedule: Option<PrayerSchedule>,
    anchors: BTreeMap<AnchorEvent, CrossingTracker>,
    /// Per-prayer trackers, populated only when prayer tracking is on.
    #[serde(default)]
    prayers: BTreeMap<Prayer, CrossingTracker>,
    #[serde(default)]
    track_prayers: bool,
    /// Local date of the most recent tick.
    #[serde(default)]
    last_tick_date: Option<NaiveDate>,
}

impl CountdownEngine {
    /// Create an engine with no schedule. Ticks report "unavailable" until
    /// a schedule is loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also detect crossings for every individual prayer.
    pub fn with_prayer_tracking(mut self, enabled: bool) -> Self {
        self.set_prayer_tracking(enabled);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn schedule(&self) -> Option<&PrayerSchedule> {
        self.schedule.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn tracks_prayers(&self) -> bool {
        self.track_prayers
    }

    pub fn last_tick_date(&self) -> Option<NaiveDate> {
        self.last_tick_date
    }

    pub fn tracker(&self, anchor: AnchorEvent) -> Option<&CrossingTracker> {
        self.anchors.get(&anchor)
    }

    /// Whether `now` falls on a different local date than the previous
    /// tick. The first tick never counts as a rollover.
    pub fn day_rolled_over(&self, now: NaiveDateTime) -> bool {
        matches!(self.last_tick_date, Some(date) if date != now.date())
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn set_prayer_tracking(&mut self, enabled: bool) {
        self.track_prayers = enabled;
        self.prayers = match (&self.schedule, enabled) {
            (Some(schedule), true) => rebind_all(&self.prayers, schedule.iter()),
            _ => BTreeMap::new(),
        };
    }

    /// Replace the active schedule.
    ///
    /// On rejection the engine keeps its previous schedule and trackers.
    /// Trackers whose bound time is unchanged keep their arm state, so
    /// refreshing an identical schedule does not re-fire a crossing that
    /// already happened today.
    pub fn load_schedule(&mut self, schedule: PrayerSchedule) -> Result<(), ScheduleError> {
        if let Err(err) = schedule.validate() {
            warn!(%err, "rejecting prayer schedule");
            return Err(err);
        }

        let anchor_times = AnchorEvent::ALL.into_iter().filter_map(|anchor| {
            schedule.get(anchor.prayer()).map(|time| (anchor, time))
        });
        self.anchors = rebind_all(&self.anchors, anchor_times);
        if self.track_prayers {
            self.prayers = rebind_all(&self.prayers, schedule.iter());
        }

        info!(
            fajr = ?schedule.get(Prayer::Fajr).map(|t| t.to_string()),
            maghrib = ?schedule.get(Prayer::Maghrib).map(|t| t.to_string()),
            "prayer schedule loaded"
        );
        self.schedule = Some(schedule);
        Ok(())
    }

    /// Advance to `now` and report countdowns and crossings. Never fails.
    pub fn tick(&mut self, now: NaiveDateTime) -> CountdownSnapshot {
        let rolled_over = self.day_rolled_over(now);
        if rolled_over {
            debug!(date = %now.date(), "local day rolled over");
        }
        self.last_tick_date = Some(now.date());

        if self.schedule.is_none() {
            return CountdownSnapshot::unavailable(now, rolled_over);
        }

        let mut countdowns = Vec::with_capacity(self.anchors.len());
        for (anchor, tracker) in self.anchors.iter_mut() {
            let scheduled = tracker.time();
            let target = next_occurrence(scheduled, now);
            let remaining_ms = (target - now).num_milliseconds().max(0) as u64;
            let just_crossed = tracker.check(now);
            if just_crossed {
                info!(anchor = %anchor, at = %now, "anchor crossed");
            }
            countdowns.push(AnchorCountdown {
                anchor: *anchor,
                prayer: anchor.prayer(),
                scheduled,
                target,
                remaining_ms,
                just_crossed,
            });
        }

        let mut crossed_prayers = Vec::new();
        for (prayer, tracker) in self.prayers.iter_mut() {
            if tracker.check(now) {
                info!(prayer = %prayer, at = %now, "prayer time crossed");
                crossed_prayers.push(*prayer);
            }
        }

        CountdownSnapshot {
            at: now,
            countdowns,
            crossed_prayers,
            day_rolled_over: rolled_over,
        }
    }
}

fn rebind_all<K, I>(
    previous: &BTreeMap<K, CrossingTracker>,
    times: I,
) -> BTreeMap<K, CrossingTracker>
where
    K: Ord + Copy,
    I: IntoIterator<Item = (K, crate::schedule::TimeOfDay)>,
{
    times
        .into_iter()
        .map(|(key, time)| {
            let tracker = match previous.get(&key) {
                Some(existing) => existing.rebind(time),
                None => CrossingTracker::new(time),
            };
            (key, tracker)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fixtures::mecca;
    use crate::schedule::TimeOfDay;
    use chrono::{Duration, NaiveDate};

    fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, d)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn loaded() -> CountdownEngine {
        let mut engine = CountdownEngine::new();
        engine.load_schedule(mecca()).unwrap();
        engine
    }

    #[test]
    fn tick_without_schedule_is_unavailable() {
        let mut engine = CountdownEngine::new();
        let snap = engine.tick(at(1, 12, 0, 0));
        assert!(!snap.is_available());
        assert!(snap.events().is_empty());
    }

    #[test]
    fn snapshot_has_both_anchors() {
        let mut engine = loaded();
        let snap = engine.tick(at(1, 12, 0, 0));
        let iftar = snap.countdown(AnchorEvent::Iftar).unwrap();
        let suhoor = snap.countdown(AnchorEvent::SuhoorEnd).unwrap();
        assert_eq!(iftar.display(), "06:30:00");
        // Fajr already passed today: 04:45 tomorrow.
        assert_eq!(suhoor.display(), "16:45:00");
        assert_eq!(suhoor.target, at(2, 4, 45, 0));
    }

    #[test]
    fn rollover_after_maghrib() {
        let mut engine = loaded();
        let snap = engine.tick(at(1, 18, 31, 0));
        let iftar = snap.countdown(AnchorEvent::Iftar).unwrap();
        assert_eq!(iftar.target, at(2, 18, 30, 0));
        assert_eq!(iftar.display(), "23:59:00");
    }

    #[test]
    fn exact_crossing_fires_once() {
        let mut engine = loaded();
        assert!(!engine.tick(at(1, 4, 44, 59)).just_crossed(AnchorEvent::SuhoorEnd));

        let snap = engine.tick(at(1, 4, 45, 0));
        assert!(snap.just_crossed(AnchorEvent::SuhoorEnd));
        assert_eq!(snap.countdown(AnchorEvent::SuhoorEnd).unwrap().remaining_ms, 0);

        for s in 1..60 {
            assert!(!engine.tick(at(1, 4, 45, s)).just_crossed(AnchorEvent::SuhoorEnd));
        }
        assert!(!engine.tick(at(1, 23, 59, 59)).just_crossed(AnchorEvent::SuhoorEnd));
    }

    #[test]
    fn sub_second_polling_fires_once() {
        let mut engine = loaded();
        let start = at(1, 18, 29, 58);
        let fired = (0..50)
            .map(|i| engine.tick(start + Duration::milliseconds(i * 100)))
            .filter(|snap| snap.just_crossed(AnchorEvent::Iftar))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn next_day_fires_again() {
        let mut engine = loaded();
        assert!(engine.tick(at(1, 4, 45, 0)).just_crossed(AnchorEvent::SuhoorEnd));
        engine.load_schedule(mecca()).unwrap();
        let snap = engine.tick(at(2, 4, 45, 0));
        assert!(snap.day_rolled_over);
        assert!(snap.just_crossed(AnchorEvent::SuhoorEnd));
    }

    #[test]
    fn identical_reload_keeps_arm_state() {
        let mut engine = loaded();
        assert!(engine.tick(at(1, 18, 30, 0)).just_crossed(AnchorEvent::Iftar));
        engine.load_schedule(mecca()).unwrap();
        assert!(!engine.tick(at(1, 18, 30, 30)).just_crossed(AnchorEvent::Iftar));
    }

    #[test]
    fn changed_time_rearms_only_that_anchor() {
        let mut engine = loaded();
        assert!(engine.tick(at(1, 4, 45, 0)).just_crossed(AnchorEvent::SuhoorEnd));
        assert!(engine.tick(at(1, 18, 30, 0)).just_crossed(AnchorEvent::Iftar));

        let moved = mecca().with(Prayer::Maghrib, TimeOfDay::new(18, 35).unwrap());
        engine.load_schedule(moved).unwrap();

        assert_eq!(engine.tracker(AnchorEvent::Iftar).unwrap().last_fired(), None);
        assert!(engine.tracker(AnchorEvent::SuhoorEnd).unwrap().last_fired().is_some());
        assert!(engine.tick(at(1, 18, 35, 0)).just_crossed(AnchorEvent::Iftar));
    }

    #[test]
    fn rejected_schedule_leaves_state_untouched() {
        let mut engine = loaded();
        engine.tick(at(1, 4, 45, 0));
        let before = engine.tracker(AnchorEvent::SuhoorEnd).cloned();

        let mut broken = mecca();
        broken.remove(Prayer::Fajr);
        assert_eq!(
            engine.load_schedule(broken),
            Err(ScheduleError::Incomplete {
                missing: Prayer::Fajr
            })
        );
        assert_eq!(engine.schedule(), Some(&mecca()));
        assert_eq!(engine.tracker(AnchorEvent::SuhoorEnd).cloned(), before);
    }

    #[test]
    fn rejected_first_schedule_stays_unavailable() {
        let mut engine = CountdownEngine::new();
        let broken = mecca().with(Prayer::Isha, TimeOfDay::new(3, 0).unwrap());
        assert!(matches!(
            engine.load_schedule(broken),
            Err(ScheduleError::OutOfOrder { .. })
        ));
        assert!(!engine.tick(at(1, 12, 0, 0)).is_available());
    }

    #[test]
    fn anchors_sharing_a_minute_fire_independently() {
        let schedule = PrayerSchedule::from_hhmm([
            (Prayer::Fajr, "05:00"),
            (Prayer::Sunrise, "05:00"),
            (Prayer::Dhuhr, "05:00"),
            (Prayer::Asr, "05:00"),
            (Prayer::Maghrib, "05:00"),
            (Prayer::Isha, "05:00"),
        ])
        .unwrap();
        let mut engine = CountdownEngine::new();
        engine.load_schedule(schedule).unwrap();
        let snap = engine.tick(at(1, 5, 0, 0));
        assert!(snap.just_crossed(AnchorEvent::Iftar));
        assert!(snap.just_crossed(AnchorEvent::SuhoorEnd));
    }

    #[test]
    fn prayer_tracking_reports_each_prayer() {
        let mut engine = CountdownEngine::new().with_prayer_tracking(true);
        engine.load_schedule(mecca()).unwrap();

        let snap = engine.tick(at(1, 12, 22, 10));
        assert_eq!(snap.crossed_prayers, vec![Prayer::Dhuhr]);
        assert!(engine.tick(at(1, 12, 22, 11)).crossed_prayers.is_empty());

        let snap = engine.tick(at(1, 18, 30, 0));
        assert_eq!(snap.crossed_prayers, vec![Prayer::Maghrib]);
        assert!(snap.just_crossed(AnchorEvent::Iftar));
    }

    #[test]
    fn prayer_tracking_off_reports_nothing() {
        let mut engine = loaded();
        assert!(engine.tick(at(1, 12, 22, 0)).crossed_prayers.is_empty());
    }

    #[test]
    fn rollover_detection_uses_local_date() {
        let mut engine = loaded();
        assert!(!engine.day_rolled_over(at(1, 23, 59, 59)));
        engine.tick(at(1, 23, 59, 59));
        assert!(!engine.day_rolled_over(at(1, 23, 59, 59)));
        assert!(engine.day_rolled_over(at(2, 0, 0, 0)));
        let snap = engine.tick(at(2, 0, 0, 0));
        assert!(snap.day_rolled_over);
        assert_eq!(engine.last_tick_date(), NaiveDate::from_ymd_opt(2026, 3, 2));
    }

    #[test]
    fn engine_state_survives_serialization() {
        let mut engine = loaded();
        engine.tick(at(1, 18, 30, 0));
        let json = serde_json::to_string(&engine).unwrap();
        let mut restored: CountdownEngine = serde_json::from_str(&json).unwrap();
        assert!(!restored.tick(at(1, 18, 30, 5)).just_crossed(AnchorEvent::Iftar));
    }
}
