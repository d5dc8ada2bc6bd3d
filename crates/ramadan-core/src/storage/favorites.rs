//! Saved cities the user can switch between.

use tracing::debug;

use super::{KvStore, Location};
use crate::error::StorageError;

pub const FAVORITES_KEY: &str = "favorite_cities";

/// Favorite cities persisted as a JSON list in a [`KvStore`].
///
/// Cities are unique by name, compared case-insensitively.
pub struct Favorites<'a, S: KvStore> {
    store: &'a S,
}

impl<'a, S: KvStore> Favorites<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> Result<Vec<Location>, StorageError> {
        Ok(self.store.get_json(FAVORITES_KEY)?.unwrap_or_default())
    }

    /// Append `location`. Returns `false` if the city was already saved.
    pub fn add(&self, location: Location) -> Result<bool, StorageError> {
        let mut all = self.list()?;
        if all.iter().any(|f| same_city(&f.city, &location.city)) {
            return Ok(false);
        }
        debug!(city = %location.city, "adding favorite");
        all.push(location);
        self.store.set_json(FAVORITES_KEY, &all)?;
        Ok(true)
    }

    /// Remove the city named `city`. Returns `false` if it was not saved.
    pub fn remove(&self, city: &str) -> Result<bool, StorageError> {
        let mut all = self.list()?;
        let before = all.len();
        all.retain(|f| !same_city(&f.city, city));
        if all.len() == before {
            return Ok(false);
        }
        self.store.set_json(FAVORITES_KEY, &all)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(FAVORITES_KEY)
    }

    pub fn find(&self, city: &str) -> Result<Option<Location>, StorageError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|f| same_city(&f.city, city)))
    }
}

fn same_city(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
