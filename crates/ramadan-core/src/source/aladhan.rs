//! Client for the AlAdhan prayer-times API.

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::error::SourceError;
use crate::hijri::HijriDate;
use crate::schedule::{Prayer, PrayerSchedule, TimeOfDay};
use crate::storage::{Location, SourceConfig};

const USER_AGENT: &str = "ramadan-companion";

/// Everything the API reports for one Gregorian day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTimings {
    pub date: NaiveDate,
    pub schedule: PrayerSchedule,
    pub hijri: HijriDate,
    /// IANA zone the times are expressed in, when reported.
    #[serde(default)]
    pub timezone: Option<String>,
}

#[derive(Deserialize)]
struct Envelope {
    code: u16,
    data: DayData,
}

#[derive(Deserialize)]
struct DayData {
    timings: HashMap<String, String>,
    date: DateBlock,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Deserialize)]
struct DateBlock {
    gregorian: GregorianBlock,
    hijri: HijriBlock,
}

#[derive(Deserialize)]
struct GregorianBlock {
    date: String,
}

#[derive(Deserialize)]
struct HijriBlock {
    day: String,
    month: HijriMonth,
    year: String,
}

#[derive(Deserialize)]
struct HijriMonth {
    number: u8,
    #[serde(default)]
    en: String,
}

#[derive(Deserialize)]
struct Meta {
    timezone: Option<String>,
}

/// Parse a `/v1/timings` response body.
///
/// Extra timings such as Imsak or Midnight are ignored. The resulting
/// schedule is validated before it is returned.
pub fn parse_timings_response(body: &str) -> Result<DailyTimings, SourceError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))?;
    if envelope.code != 200 {
        return Err(SourceError::Status {
            code: envelope.code,
        });
    }
    let data = envelope.data;

    let mut schedule = PrayerSchedule::new();
    for prayer in Prayer::ALL {
        if let Some(raw) = data.timings.get(prayer.name()) {
            schedule.insert(prayer, TimeOfDay::parse(raw)?);
        }
    }
    schedule.validate()?;

    let date = NaiveDate::parse_from_str(&data.date.gregorian.date, "%d-%m-%Y").map_err(|e| {
        SourceError::Malformed(format!(
            "gregorian date '{}': {e}",
            data.date.gregorian.date
        ))
    })?;

    let hijri = &data.date.hijri;
    let hijri = HijriDate {
        day: parse_field("hijri day", &hijri.day)?,
        month: hijri.month.number,
        year: parse_field("hijri year", &hijri.year)?,
        month_name: hijri.month.en.clone(),
    };

    Ok(DailyTimings {
        date,
        schedule,
        hijri,
        timezone: data.meta.and_then(|m| m.timezone),
    })
}

fn parse_field<T: std::str::FromStr>(what: &str, raw: &str) -> Result<T, SourceError> {
    raw.trim()
        .parse()
        .map_err(|_| SourceError::Malformed(format!("{what} '{raw}'")))
}

/// Fetches one day of prayer times per request. Does not retry.
pub struct AladhanClient {
    base_url: Url,
    http: Client,
}

impl AladhanClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { base_url, http })
    }

    pub fn from_config(config: &SourceConfig) -> Result<Self, SourceError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    /// `{base}/v1/timings/DD-MM-YYYY?latitude=..&longitude=..&method=..`
    pub fn timings_url(
        &self,
        date: NaiveDate,
        location: &Location,
        method: u8,
    ) -> Result<Url, SourceError> {
        let mut url = self
            .base_url
            .join(&format!("v1/timings/{}", date.format("%d-%m-%Y")))?;
        url.query_pairs_mut()
            .append_pair("latitude", &location.latitude.to_string())
            .append_pair("longitude", &location.longitude.to_string())
            .append_pair("method", &method.to_string());
        Ok(url)
    }

    pub async fn fetch_day(
        &self,
        date: NaiveDate,
        location: &Location,
        method: u8,
    ) -> Result<DailyTimings, SourceError> {
        let url = self.timings_url(date, location, method)?;
        debug!(%url, "fetching prayer times");

        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status {
                code: resp.status().as_u16(),
            });
        }
        let body = resp.text().await?;
        let timings = parse_timings_response(&body)?;

        info!(
            city = %location.city,
            date = %timings.date,
            hijri = %timings.hijri,
            "prayer times fetched"
        );
        Ok(timings)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::MECCA_BODY;
    use super::*;
    use crate::error::ScheduleError;

    #[test]
    fn parses_full_response() {
        let day = parse_timings_response(MECCA_BODY).unwrap();
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(day.schedule.len(), 6);
        assert_eq!(day.schedule.get(Prayer::Maghrib), Some(TimeOfDay::new(18, 30).unwrap()));
        assert_eq!(day.schedule.get(Prayer::Isha), Some(TimeOfDay::new(20, 0).unwrap()));
        assert!(day.hijri.is_ramadan());
        assert_eq!(day.hijri.day, 12);
        assert_eq!(day.hijri.year, 1447);
        assert_eq!(day.timezone.as_deref(), Some("Asia/Riyadh"));
    }

    #[test]
    fn missing_prayer_is_a_schedule_error() {
        let body = MECCA_BODY.replace("\"Asr\": \"15:47\",", "");
        assert!(matches!(
            parse_timings_response(&body),
            Err(SourceError::Schedule(ScheduleError::Incomplete {
                missing: Prayer::Asr
            }))
        ));
    }

    #[test]
    fn garbage_time_is_rejected() {
        let body = MECCA_BODY.replace("\"18:30\"", "\"sunset-ish\"");
        assert!(matches!(
            parse_timings_response(&body),
            Err(SourceError::Schedule(ScheduleError::InvalidTime { .. }))
        ));
    }

    #[test]
    fn non_json_is_malformed() {
        assert!(matches!(
            parse_timings_response("<html>busy</html>"),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn error_code_in_body() {
        let body = r#"{"code": 400, "status": "Bad Request", "data": {"timings": {}, "date": {"gregorian": {"date": ""}, "hijri": {"day": "", "month": {"number": 0}, "year": ""}}}}"#;
        assert!(matches!(
            parse_timings_response(body),
            Err(SourceError::Status { code: 400 })
        ));
    }

    #[test]
    fn url_includes_date_and_coordinates() {
        let client = AladhanClient::new("https://api.aladhan.com", Duration::from_secs(5)).unwrap();
        let url = client
            .timings_url(
                NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                &Location::mecca(),
                4,
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.aladhan.com/v1/timings/01-03-2026?latitude=21.4225&longitude=39.8262&method=4"
        );
    }

    #[test]
    fn base_url_path_is_kept() {
        let client = AladhanClient::new("http://localhost:8080/proxy", Duration::from_secs(5)).unwrap();
        let url = client
            .timings_url(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), &Location::mecca(), 2)
            .unwrap();
        assert!(url.as_str().starts_with("http://localhost:8080/proxy/v1/timings/01-03-2026?"));
    }
}
