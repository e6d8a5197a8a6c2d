mod config;

pub use config::{BreathingConfig, Config, MeditationConfig, TickerConfig};

use std::path::PathBuf;

/// Returns the configuration directory, creating it if needed.
///
/// `BREATHPACE_CONFIG_DIR` wins when set. Otherwise `~/.config/breathpace/`,
/// or `~/.config/breathpace-dev/` with `BREATHPACE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("BREATHPACE_CONFIG_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BREATHPACE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("breathpace-dev")
            } else {
                base_dir.join("breathpace")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
