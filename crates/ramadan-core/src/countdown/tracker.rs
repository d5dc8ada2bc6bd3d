use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::schedule::TimeOfDay;

/// One-shot-per-day crossing detector for a single scheduled time.
///
/// Fires when the clock's `hh:mm` equals the bound time and it has not
/// already fired on that calendar date. The stored date doubles as the
/// arm state: a new day re-arms the tracker without an explicit reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingTracker {
    time: TimeOfDay,
    last_fired: Option<NaiveDate>,
}

impl CrossingTracker {
    pub fn new(time: TimeOfDay) -> Self {
        Self {
            time,
            last_fired: None,
        }
    }

    pub fn time(&self) -> TimeOfDay {
        self.time
    }

    pub fn last_fired(&self) -> Option<NaiveDate> {
        self.last_fired
    }

    /// Carry this tracker over to a reloaded schedule.
    ///
    /// Keeps the arm state when the time is unchanged, otherwise starts a
    /// fresh tracker for the new time.
    pub fn rebind(&self, time: TimeOfDay) -> Self {
        if time == self.time {
            self.clone()
        } else {
            Self::new(time)
        }
    }

    /// Test and set in one step. Returns `true` exactly once per matching
    /// minute per calendar date.
    pub fn check(&mut self, now: NaiveDateTime) -> bool {
        if !self.time.matches_minute(now) {
            return false;
        }
        let today = now.date();
        if self.last_fired == Some(today) {
            return false;
        }
        self.last_fired = Some(today);
        true
    }
}
