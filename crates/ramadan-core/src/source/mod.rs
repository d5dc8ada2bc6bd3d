//! Remote prayer-time source.
//!
//! Fetching and parsing are kept apart: [`parse_timings_response`] is a pure
//! function over the response body, and [`AladhanClient`] only does I/O.

mod aladhan;

pub use aladhan::{parse_timings_response, AladhanClient, DailyTimings};

#[cfg(test)]
pub(crate) use aladhan::fixtures;
