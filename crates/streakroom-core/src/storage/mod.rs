mod config;
pub mod database;
pub mod keyring_store;
pub mod migrations;
mod traits;

pub use config::{AdvisorConfig, Config, LogConfig, StatsConfig};
pub use database::Database;
pub use traits::{AchievementStore, RecordStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the data directory, creating it if needed.
///
/// `STREAKROOM_DATA_DIR` wins when set. Otherwise `~/.config/streakroom/`,
/// or `~/.config/streakroom-dev/` when `STREAKROOM_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var("STREAKROOM_DATA_DIR") {
        Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom.trim()),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("STREAKROOM_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("streakroom-dev")
            } else {
                base_dir.join("streakroom")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
