use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::countdown::AnchorEvent;
use crate::schedule::Prayer;

/// Discrete happenings derived from engine ticks.
/// Hosts log them, print them, or forward them to a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An anchor's scheduled minute was reached (fires once per day).
    AnchorCrossed {
        anchor: AnchorEvent,
        prayer: Prayer,
        at: NaiveDateTime,
    },
    /// An individual prayer's scheduled minute was reached.
    PrayerCrossed { prayer: Prayer, at: NaiveDateTime },
    /// First tick observed on a new local calendar date.
    /// Hosts fetch the new day's schedule in response.
    DayRolledOver { date: NaiveDate, at: NaiveDateTime },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let at = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(18, 30, 0)
            .unwrap();
        let json = serde_json::to_value(Event::AnchorCrossed {
            anchor: AnchorEvent::Iftar,
            prayer: Prayer::Maghrib,
            at,
        })
        .unwrap();
        assert_eq!(json["type"], "AnchorCrossed");
        assert_eq!(json["anchor"], "Iftar");
        assert_eq!(json["prayer"], "Maghrib");
    }
}
