//! Hijri calendar date as reported by the prayer-time source.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ninth month of the Hijri calendar.
pub const RAMADAN: u8 = 9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HijriDate {
    pub day: u8,
    /// 1-based month number.
    pub month: u8,
    pub year: u16,
    /// English transliteration, e.g. "Ramaḍān".
    #[serde(default)]
    pub month_name: String,
}

impl HijriDate {
    pub fn is_ramadan(&self) -> bool {
        self.month == RAMADAN
    }

    /// Day number within Ramadan, if this date falls in it.
    pub fn ramadan_day(&self) -> Option<u8> {
        self.is_ramadan().then_some(self.day)
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{}", self.day, self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u8, month: u8) -> HijriDate {
        HijriDate {
            day,
            month,
            year: 1447,
            month_name: String::new(),
        }
    }

    #[test]
    fn ramadan_is_month_nine() {
        assert!(date(1, 9).is_ramadan());
        assert!(!date(1, 10).is_ramadan());
        assert_eq!(date(17, 9).ramadan_day(), Some(17));
        assert_eq!(date(17, 8).ramadan_day(), None);
    }

    #[test]
    fn displays_zero_padded() {
        assert_eq!(date(3, 9).to_string(), "03/09/1447");
    }
}
