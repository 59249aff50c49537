mod config;

pub use config::{Config, SchedulingConfig, MAX_WINDOW_DAYS};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/slotfit[-dev]/` based on SLOTFIT_ENV.
///
/// Set SLOTFIT_ENV=dev to use development data directory, or
/// SLOTFIT_CONFIG_DIR to use an explicit directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("SLOTFIT_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SLOTFIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("slotfit-dev")
            } else {
                base_dir.join("slotfit")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
