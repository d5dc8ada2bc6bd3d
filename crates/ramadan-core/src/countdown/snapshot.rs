use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::AnchorEvent;
use crate::events::Event;
use crate::schedule::{Prayer, TimeOfDay};

/// Format whole seconds as `HH:MM:SS`.
///
/// Each field is zero-padded to two digits; hours are not capped.
pub fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Live countdown to one anchor's next occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorCountdown {
    pub anchor: AnchorEvent,
    pub prayer: Prayer,
    pub scheduled: TimeOfDay,
    /// Next occurrence at or after the tick instant.
    pub target: NaiveDateTime,
    /// Never negative.
    pub remaining_ms: u64,
    /// True only on the tick that crossed the scheduled minute.
    pub just_crossed: bool,
}

impl AnchorCountdown {
    /// Remaining time in whole seconds; fractions are dropped.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms / 1000
    }

    pub fn hours(&self) -> u64 {
        self.remaining_secs() / 3600
    }

    pub fn minutes(&self) -> u64 {
        (self.remaining_secs() % 3600) / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining_secs() % 60
    }

    pub fn display(&self) -> String {
        format_hms(self.remaining_secs())
    }
}

/// Result of one engine tick. Read-only for consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub at: NaiveDateTime,
    /// One entry per anchor; empty when no schedule is loaded.
    pub countdowns: Vec<AnchorCountdown>,
    /// Prayers crossed on this tick, when per-prayer tracking is enabled.
    #[serde(default)]
    pub crossed_prayers: Vec<Prayer>,
    /// Local calendar date changed since the previous tick.
    #[serde(default)]
    pub day_rolled_over: bool,
}

impl CountdownSnapshot {
    pub fn unavailable(at: NaiveDateTime, day_rolled_over: bool) -> Self {
        Self {
            at,
            countdowns: Vec::new(),
            crossed_prayers: Vec::new(),
            day_rolled_over,
        }
    }

    pub fn is_available(&self) -> bool {
        !self.countdowns.is_empty()
    }

    pub fn countdown(&self, anchor: AnchorEvent) -> Option<&AnchorCountdown> {
        self.countdowns.iter().find(|c| c.anchor == anchor)
    }

    pub fn just_crossed(&self, anchor: AnchorEvent) -> bool {
        self.countdown(anchor).is_some_and(|c| c.just_crossed)
    }

    /// Crossings and rollovers on this tick, in emission order.
    pub fn events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.day_rolled_over {
            events.push(Event::DayRolledOver {
                date: self.at.date(),
                at: self.at,
            });
        }
        for countdown in self.countdowns.iter().filter(|c| c.just_crossed) {
            events.push(Event::AnchorCrossed {
                anchor: countdown.anchor,
                prayer: countdown.prayer,
                at: self.at,
            });
        }
        for prayer in &self.crossed_prayers {
            events.push(Event::PrayerCrossed {
                prayer: *prayer,
                at: self.at,
            });
        }
        events
    }
}
