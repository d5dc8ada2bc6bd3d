//! Daily prayer schedule.
//!
//! A [`PrayerSchedule`] maps each of the six daily prayers to a local
//! time of day. Times are timezone-naive: they are interpreted in the same
//! local frame as the clock that drives the countdown engine.

mod timeline;

pub use timeline::{PrayerTimeline, TimelinePosition};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// The daily prayers in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        }
    }

    /// Sunrise marks the end of the Fajr window; it has no call to prayer.
    pub fn is_call_to_prayer(self) -> bool {
        self != Prayer::Sunrise
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Prayer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Prayer::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown prayer: {s}"))
    }
}

/// Local time of day with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidTime {
                value: format!("{hour:02}:{minute:02}"),
            });
        }
        Ok(Self { hour, minute })
    }

    /// Parse a 24-hour `"HH:MM"` value.
    ///
    /// Some sources append a zone label, e.g. `"04:45 (+03)"`; the label is
    /// dropped. Seconds are not accepted.
    pub fn parse(raw: &str) -> Result<Self, ScheduleError> {
        let invalid = || ScheduleError::InvalidTime {
            value: raw.to_string(),
        };
        let value = match raw.split_once('(') {
            Some((head, _)) => head,
            None => raw,
        }
        .trim();

        let (h, m) = value.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes elapsed since local midnight.
    pub fn minutes_of_day(self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .unwrap_or(NaiveTime::MIN)
    }

    /// This time of day on `date`, at second zero.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.to_naive_time())
    }

    /// Whether `now` falls inside this minute.
    pub fn matches_minute(self, now: NaiveDateTime) -> bool {
        now.hour() == u32::from(self.hour) && now.minute() == u32::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TimeOfDay> for String {
    fn from(value: TimeOfDay) -> Self {
        value.to_string()
    }
}

/// Prayer times for one calendar day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrayerSchedule {
    times: BTreeMap<Prayer, TimeOfDay>,
}

impl PrayerSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, prayer: Prayer, time: TimeOfDay) -> Self {
        self.times.insert(prayer, time);
        self
    }

    /// Build from `(prayer, "HH:MM")` pairs, failing on the first bad value.
    pub fn from_hhmm<'a, I>(pairs: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (Prayer, &'a str)>,
    {
        let mut schedule = Self::new();
        for (prayer, raw) in pairs {
            schedule.insert(prayer, TimeOfDay::parse(raw)?);
        }
        Ok(schedule)
    }

    pub fn insert(&mut self, prayer: Prayer, time: TimeOfDay) -> Option<TimeOfDay> {
        self.times.insert(prayer, time)
    }

    pub fn remove(&mut self, prayer: Prayer) -> Option<TimeOfDay> {
        self.times.remove(&prayer)
    }

    pub fn get(&self, prayer: Prayer) -> Option<TimeOfDay> {
        self.times.get(&prayer).copied()
    }

    /// Entries in canonical prayer order.
    pub fn iter(&self) -> impl Iterator<Item = (Prayer, TimeOfDay)> + '_ {
        self.times.iter().map(|(p, t)| (*p, *t))
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Check completeness and ordering.
    ///
    /// Every prayer must be present, and times must be non-decreasing from
    /// Fajr to Isha.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if let Some(missing) = Prayer::ALL.into_iter().find(|p| !self.times.contains_key(p)) {
            return Err(ScheduleError::Incomplete { missing });
        }

        let entries: Vec<(Prayer, TimeOfDay)> = self.iter().collect();
        for pair in entries.windows(2) {
            let (earlier, earlier_time) = pair[0];
            let (later, later_time) = pair[1];
            if later_time < earlier_time {
                return Err(ScheduleError::OutOfOrder {
                    earlier,
                    earlier_time: earlier_time.to_string(),
                    later,
                    later_time: later_time.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A plausible Ramadan day in Mecca.
    pub fn mecca() -> PrayerSchedule {
        PrayerSchedule::from_hhmm([
            (Prayer::Fajr, "04:45"),
            (Prayer::Sunrise, "06:05"),
            (Prayer::Dhuhr, "12:22"),
            (Prayer::Asr, "15:47"),
            (Prayer::Maghrib, "18:30"),
            (Prayer::Isha, "20:00"),
        ])
        .unwrap()
    }
}
