//! Fetched days kept in a [`KvStore`] so repeat runs skip the network.

use chrono::NaiveDate;

use super::{KvStore, Location};
use crate::error::StorageError;
use crate::source::DailyTimings;

/// Days are keyed by date, coordinates (to four places) and method.
pub struct TimingsCache<'a, S: KvStore> {
    store: &'a S,
}

impl<'a, S: KvStore> TimingsCache<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn key(date: NaiveDate, location: &Location, method: u8) -> String {
        format!(
            "timings:{date}:{:.4}:{:.4}:{method}",
            location.latitude, location.longitude
        )
    }

    pub fn get(
        &self,
        date: NaiveDate,
        location: &Location,
        method: u8,
    ) -> Result<Option<DailyTimings>, StorageError> {
        self.store.get_json(&Self::key(date, location, method))
    }

    pub fn put(
        &self,
        location: &Location,
        method: u8,
        timings: &DailyTimings,
    ) -> Result<(), StorageError> {
        self.store
            .set_json(&Self::key(timings.date, location, method), timings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_timings_response;
    use crate::source::fixtures::MECCA_BODY;
    use crate::storage::MemoryStore;

    #[test]
    fn stores_by_date_location_and_method() {
        let store = MemoryStore::new();
        let cache = TimingsCache::new(&store);
        let day = parse_timings_response(MECCA_BODY).unwrap();
        let mecca = Location::mecca();

        assert!(cache.get(day.date, &mecca, 4).unwrap().is_none());
        cache.put(&mecca, 4, &day).unwrap();
        assert_eq!(cache.get(day.date, &mecca, 4).unwrap(), Some(day.clone()));
        assert!(cache.get(day.date, &mecca, 2).unwrap().is_none());

        let mut elsewhere = mecca.clone();
        elsewhere.latitude += 1.0;
        assert!(cache.get(day.date, &elsewhere, 4).unwrap().is_none());
    }

    #[test]
    fn key_rounds_coordinates() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(
            TimingsCache::<MemoryStore>::key(date, &Location::mecca(), 4),
            "timings:2026-03-01:21.4225:39.8262:4"
        );
    }
}
