//! Core error types for breathpace-core.
//!
//! Engine commands other than `configure` are total and never fail; the
//! errors here come from configuration and config-file handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::PhaseKind;

/// Core error type for breathpace-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// An engine or pattern was given values it cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] InvalidConfig),

    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No built-in or custom pattern with this id
    #[error("Unknown breathing pattern: {0}")]
    UnknownPattern(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML write error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

/// Rejected engine or pattern configuration.
///
/// `configure` is all-or-nothing: when this is returned the engine keeps its
/// previous state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidConfig {
    #[error("total cycles must be at least 1")]
    ZeroCycles,

    #[error("duration must be at least 1 second")]
    ZeroDuration,

    #[error("pattern '{pattern}' has no phase with a positive duration")]
    NoActivePhases { pattern: String },

    #[error("pattern '{pattern}' requires a positive {phase} duration")]
    MissingPhase { pattern: String, phase: PhaseKind },

    #[error("pattern id must not be empty")]
    EmptyId,

    #[error("pattern id '{0}' is already defined")]
    DuplicatePattern(String),

    #[error("tick interval must be at least 1 millisecond")]
    ZeroInterval,
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

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_wraps_into_core_error() {
        let err: CoreError = InvalidConfig::ZeroCycles.into();
        assert!(matches!(err, CoreError::InvalidConfig(InvalidConfig::ZeroCycles)));
        assert_eq!(
            err.to_string(),
            "Invalid configuration: total cycles must be at least 1"
        );
    }

    #[test]
    fn missing_phase_message_names_phase() {
        let err = InvalidConfig::MissingPhase {
            pattern: "calm".into(),
            phase: PhaseKind::Exhale,
        };
        assert_eq!(
            err.to_string(),
            "pattern 'calm' requires a positive exhale duration"
        );
    }
}
