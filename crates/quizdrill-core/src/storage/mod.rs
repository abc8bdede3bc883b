mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, ResultRecord, Stats};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/quizdrill[-dev]/` based on QUIZDRILL_ENV.
///
/// Set QUIZDRILL_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("QUIZDRILL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("quizdrill-dev")
    } else {
        base_dir.join("quizdrill")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
