mod config;
pub mod favorites;
pub mod kv;
pub mod timings_cache;

pub use config::{
    CalculationConfig, Config, Location, NotificationsConfig, SourceConfig, UiConfig,
};
pub use favorites::Favorites;
pub use kv::{KvStore, MemoryStore, SqliteStore};
pub use timings_cache::TimingsCache;

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/ramadan-companion[-dev]/` based on RAMADAN_ENV.
///
/// Set RAMADAN_ENV=dev to use the development data directory, or
/// RAMADAN_CONFIG_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("RAMADAN_CONFIG_DIR") {
        Some(explicit) => PathBuf::from(explicit),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("RAMADAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("ramadan-companion-dev")
            } else {
                base_dir.join("ramadan-companion")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
