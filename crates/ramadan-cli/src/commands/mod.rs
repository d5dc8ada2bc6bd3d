pub mod config;
pub mod countdown;
pub mod favorites;
pub mod hijri;
pub mod status;
pub mod times;

use chrono::{Local, NaiveDate, NaiveDateTime};
use ramadan_core::{AladhanClient, Config, DailyTimings, KvStore, TimingsCache};
use tracing::{debug, warn};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Local wall-clock time, in the same frame as the schedule.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn today() -> NaiveDate {
    now().date()
}

/// Timings for `date` at the configured location, from the cache when
/// possible. Fetched days are cached.
pub fn load_day<S: KvStore>(store: &S, config: &Config, date: NaiveDate) -> CliResult<DailyTimings> {
    let cache = TimingsCache::new(store);
    let method = config.calculation.method;

    match cache.get(date, &config.location, method) {
        Ok(Some(day)) => {
            debug!(%date, "using cached prayer times");
            return Ok(day);
        }
        Ok(None) => {}
        Err(e) => warn!(%e, "ignoring unreadable cached prayer times"),
    }

    let client = AladhanClient::from_config(&config.source)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let day = runtime.block_on(client.fetch_day(date, &config.location, method))?;
    cache.put(&config.location, method, &day)?;
    Ok(day)
}
