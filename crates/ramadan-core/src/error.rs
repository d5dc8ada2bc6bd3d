//! Core error types for ramadan-core.
//!
//! Errors are grouped by the collaborator that raises them. Schedule errors
//! are local and recoverable: a rejected schedule leaves the engine on the
//! previously loaded one.

use std::path::PathBuf;
use thiserror::Error;

use crate::schedule::Prayer;

/// Core error type for ramadan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Schedule validation errors
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Prayer-time source errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejection reasons for a prayer schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A required prayer has no time in the schedule.
    #[error("schedule is missing {missing}")]
    Incomplete { missing: Prayer },

    /// Times do not follow the canonical prayer order.
    #[error("{later} ({later_time}) is scheduled before {earlier} ({earlier_time})")]
    OutOfOrder {
        earlier: Prayer,
        earlier_time: String,
        later: Prayer,
        later_time: String,
    },

    /// Hour or minute out of range, or an unparseable "HH:MM" value.
    #[error("invalid time of day: {value}")]
    InvalidTime { value: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database file
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(#[from] rusqlite::Error),

    /// Stored value could not be decoded
    #[error("Corrupt value under '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Errors raised while fetching a day's schedule from the remote API.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request did not complete in time
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Non-success HTTP status
    #[error("API returned HTTP {code}")]
    Status { code: u16 },

    /// Response body did not have the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Response parsed but the schedule it carries was rejected
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// Base URL could not be combined with the request path
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SourceError::Timeout
        } else if let Some(status) = err.status() {
            SourceError::Status {
                code: status.as_u16(),
            }
        } else if err.is_decode() {
            SourceError::Malformed(err.to_string())
        } else {
            SourceError::Network(err)
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
