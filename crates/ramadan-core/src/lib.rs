//! # Ramadan Companion Core Library
//!
//! Core logic for the Ramadan companion: live countdowns to Iftar and the
//! end of Suhoor, detection of the moment each scheduled time is reached,
//! and the preferences and data plumbing around them. The `ramadan` CLI is
//! a thin host over this crate.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: A wall-clock-driven engine; the caller invokes
//!   `tick(now)` about once per second and renders the returned snapshot
//! - **Schedule**: Validated daily prayer times and the current position
//!   between them
//! - **Source**: Fetches one day of prayer times and the Hijri date over HTTP
//! - **Storage**: TOML configuration, a SQLite key-value store and favorite
//!   cities
//! - **Notifications**: Maps crossings to alerts using the user's toggles
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Countdown and crossing detection
//! - [`PrayerSchedule`]: One day of prayer times
//! - [`AladhanClient`]: Prayer-time API client
//! - [`Config`]: Application configuration management
//! - [`AlertDispatcher`]: Crossing-to-alert mapping

pub mod countdown;
pub mod schedule;
pub mod source;
pub mod storage;
pub mod notifications;
pub mod events;
pub mod hijri;
pub mod error;

pub use countdown::{format_hms, AnchorCountdown, AnchorEvent, CountdownEngine, CountdownSnapshot};
pub use schedule::{Prayer, PrayerSchedule, PrayerTimeline, TimeOfDay, TimelinePosition};
pub use source::{AladhanClient, DailyTimings};
pub use storage::{Config, Favorites, KvStore, Location, MemoryStore, SqliteStore, TimingsCache};
pub use notifications::{Alert, AlertDispatcher, AlertSource, NotificationSink};
pub use events::Event;
pub use hijri::HijriDate;
pub use error::{ConfigError, CoreError, ScheduleError, SourceError, StorageError};
