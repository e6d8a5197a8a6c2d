//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Default breathing pattern and cycle count
//! - Meditation duration and ambient sound settings
//! - Tick interval used by the host's tick source
//! - Custom breathing patterns
//!
//! Configuration is stored at `~/.config/breathpace/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::data_dir;
use crate::ambient::AmbientMixer;
use crate::catalog;
use crate::error::{ConfigError, CoreError, InvalidConfig, Result};
use crate::timer::{CountdownEngine, PatternDefinition, PhaseCycleEngine};

/// Breathing-session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default = "default_cycles")]
    pub cycles: u32,
}

/// Meditation-session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationConfig {
    #[serde(default = "default_meditation_secs")]
    pub duration_secs: u32,
    /// Ambient sound id from the catalog.
    #[serde(default)]
    pub sound: Option<String>,
    #[serde(default = "default_true")]
    pub muted: bool,
    #[serde(default = "default_volume")]
    pub volume: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Milliseconds between ticks.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/breathpace/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub meditation: MeditationConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    /// User-defined patterns, offered alongside the built-in ones.
    #[serde(default)]
    pub custom_patterns: Vec<PatternDefinition>,
}

// Default functions
fn default_pattern() -> String {
    catalog::DEFAULT_PATTERN_ID.into()
}
fn default_cycles() -> u32 {
    catalog::DEFAULT_CYCLES
}
fn default_meditation_secs() -> u32 {
    catalog::DEFAULT_MEDITATION_SECS
}
fn default_true() -> bool {
    true
}
fn default_volume() -> f32 {
    0.5
}
fn default_interval_ms() -> u64 {
    1000
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            cycles: default_cycles(),
        }
    }
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_meditation_secs(),
            sound: None,
            muted: true,
            volume: default_volume(),
        }
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            breathing: BreathingConfig::default(),
            meditation: MeditationConfig::default(),
            ticker: TickerConfig::default(),
            custom_patterns: Vec::new(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;

            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<u64>() {
                        serde_json::Value::Number(n.into())
                    } else if let Ok(n) = value.parse::<f64>() {
                        serde_json::Number::from_f64(n)
                            .map(serde_json::Value::Number)
                            .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as number")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // Optional fields read back as null; "none" clears them.
                _ if value == "none" => serde_json::Value::Null,
                _ => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults there on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or
    /// parsed, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, creating it with defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                debug!(path = %path.display(), "config loaded");
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                debug!(path = %path.display(), "wrote default config");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key.
    ///
    /// The change is applied only if the resulting configuration is valid.
    /// Nothing is written to disk; call [`Config::save`] to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the new configuration fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check the configuration is usable by the engines.
    pub fn validate(&self) -> Result<()> {
        if self.breathing.cycles < 1 {
            return Err(InvalidConfig::ZeroCycles.into());
        }
        if self.meditation.duration_secs < 1 {
            return Err(InvalidConfig::ZeroDuration.into());
        }
        if self.ticker.interval_ms < 1 {
            return Err(InvalidConfig::ZeroInterval.into());
        }
        if !(0.0..=1.0).contains(&self.meditation.volume) {
            return Err(ConfigError::InvalidValue {
                key: "meditation.volume".into(),
                message: format!("{} is outside 0.0..=1.0", self.meditation.volume),
            }
            .into());
        }
        if let Some(sound) = &self.meditation.sound {
            if catalog::ambient_sound(sound).is_none() {
                return Err(ConfigError::InvalidValue {
                    key: "meditation.sound".into(),
                    message: format!("unknown ambient sound '{sound}'"),
                }
                .into());
            }
        }

        let mut seen: Vec<String> = catalog::builtin_patterns().into_iter().map(|p| p.id).collect();
        for pattern in &self.custom_patterns {
            if pattern.id.trim().is_empty() {
                return Err(InvalidConfig::EmptyId.into());
            }
            pattern.validate()?;
            if seen.contains(&pattern.id) {
                return Err(InvalidConfig::DuplicatePattern(pattern.id.clone()).into());
            }
            seen.push(pattern.id.clone());
        }

        self.pattern(&self.breathing.pattern)?;
        Ok(())
    }

    /// Built-in patterns followed by custom ones.
    pub fn patterns(&self) -> Vec<PatternDefinition> {
        let mut patterns = catalog::builtin_patterns();
        patterns.extend(self.custom_patterns.iter().cloned());
        patterns
    }

    pub fn pattern(&self, id: &str) -> Result<PatternDefinition> {
        self.patterns()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::UnknownPattern(id.to_string()))
    }

    /// Idle breathing engine. `pattern` and `cycles` override the defaults.
    pub fn breathing_engine(
        &self,
        pattern: Option<&str>,
        cycles: Option<u32>,
    ) -> Result<PhaseCycleEngine> {
        let pattern = self.pattern(pattern.unwrap_or(&self.breathing.pattern))?;
        let cycles = cycles.unwrap_or(self.breathing.cycles);
        Ok(PhaseCycleEngine::new(pattern, cycles)?)
    }

    pub fn meditation_engine(&self, duration_secs: Option<u32>) -> Result<CountdownEngine> {
        Ok(CountdownEngine::new(
            duration_secs.unwrap_or(self.meditation.duration_secs),
        )?)
    }

    pub fn ambient_mixer(&self) -> AmbientMixer {
        AmbientMixer::new(
            self.meditation.sound.clone(),
            self.meditation.muted,
            self.meditation.volume,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{PhaseDurations, PhaseKind};

    fn calm() -> PatternDefinition {
        PatternDefinition::new(
            "calm",
            "Calm",
            PhaseDurations {
                inhale: 5,
                hold1: 0,
                exhale: 5,
                hold2: 0,
            },
        )
        .unwrap()
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.breathing.pattern, "box");
        assert_eq!(parsed.breathing.cycles, 5);
        assert_eq!(parsed.meditation.duration_secs, 600);
        assert!(parsed.meditation.muted);
        assert_eq!(parsed.ticker.interval_ms, 1000);
    }

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.breathing.cycles, 5);
        assert!(parsed.custom_patterns.is_empty());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("breathing.pattern").as_deref(), Some("box"));
        assert_eq!(cfg.get("breathing.cycles").as_deref(), Some("5"));
        assert_eq!(cfg.get("meditation.muted").as_deref(), Some("true"));
        assert!(cfg.get("breathing.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_values() {
        let mut cfg = Config::default();
        cfg.set("breathing.cycles", "7").unwrap();
        cfg.set("breathing.pattern", "478").unwrap();
        cfg.set("meditation.muted", "false").unwrap();
        cfg.set("meditation.volume", "0.8").unwrap();
        cfg.set("meditation.sound", "ocean").unwrap();
        assert_eq!(cfg.breathing.cycles, 7);
        assert_eq!(cfg.breathing.pattern, "478");
        assert!(!cfg.meditation.muted);
        assert!((cfg.meditation.volume - 0.8).abs() < 1e-6);
        assert_eq!(cfg.meditation.sound.as_deref(), Some("ocean"));

        cfg.set("meditation.sound", "none").unwrap();
        assert!(cfg.meditation.sound.is_none());
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("breathing.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("meditation.muted", "not_a_bool").is_err());
        assert!(cfg.set("breathing.cycles", "many").is_err());
    }

    #[test]
    fn set_rejects_values_that_break_validation() {
        let mut cfg = Config::default();
        let err = cfg.set("breathing.cycles", "0").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(InvalidConfig::ZeroCycles)));
        assert_eq!(cfg.breathing.cycles, 5);

        assert!(matches!(
            cfg.set("breathing.pattern", "wim-hof").unwrap_err(),
            CoreError::UnknownPattern(_)
        ));
        assert!(cfg.set("meditation.sound", "traffic").is_err());
        assert!(cfg.set("meditation.volume", "2").is_err());
        assert!(cfg.set("ticker.interval_ms", "0").is_err());
    }

    #[test]
    fn custom_patterns_are_listed_after_builtins() {
        let mut cfg = Config::default();
        cfg.custom_patterns.push(calm());
        let ids: Vec<_> = cfg.patterns().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["box", "478", "triangle", "calm"]);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn custom_pattern_cannot_shadow_builtin() {
        let mut cfg = Config::default();
        let mut shadow = calm();
        shadow.id = "box".into();
        cfg.custom_patterns.push(shadow);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            CoreError::InvalidConfig(InvalidConfig::DuplicatePattern(id)) if id == "box"
        ));
    }

    #[test]
    fn custom_pattern_needs_an_id() {
        let mut cfg = Config::default();
        let mut blank = calm();
        blank.id = " ".into();
        cfg.custom_patterns.push(blank);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            CoreError::InvalidConfig(InvalidConfig::EmptyId)
        ));
    }

    #[test]
    fn invalid_custom_pattern_is_rejected() {
        let mut cfg = Config::default();
        let mut broken = calm();
        broken.phase_durations.exhale = 0;
        cfg.custom_patterns.push(broken);
        assert!(matches!(
            cfg.validate().unwrap_err(),
            CoreError::InvalidConfig(InvalidConfig::MissingPhase {
                phase: PhaseKind::Exhale,
                ..
            })
        ));
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.breathing.pattern, "box");
        assert!(path.exists());
    }

    #[test]
    fn save_and_load_custom_patterns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.custom_patterns.push(calm().with_description("Slow and even"));
        cfg.breathing.pattern = "calm".into();
        cfg.meditation.sound = Some("night".into());
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.breathing.pattern, "calm");
        assert_eq!(loaded.custom_patterns.len(), 1);
        assert_eq!(loaded.custom_patterns[0].description, "Slow and even");
        assert_eq!(loaded.meditation.sound.as_deref(), Some("night"));
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "breathing = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path).unwrap_err(),
            CoreError::Config(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn engines_built_from_config() {
        let mut cfg = Config::default();
        cfg.breathing.cycles = 3;
        let engine = cfg.breathing_engine(None, None).unwrap();
        assert_eq!(engine.pattern().id, "box");
        assert_eq!(engine.total_cycles(), 3);

        let engine = cfg.breathing_engine(Some("triangle"), Some(10)).unwrap();
        assert_eq!(engine.sequence().len(), 3);
        assert_eq!(engine.total_cycles(), 10);

        assert!(cfg.breathing_engine(None, Some(0)).is_err());
        assert_eq!(cfg.meditation_engine(None).unwrap().total_seconds(), 600);
        assert_eq!(cfg.meditation_engine(Some(90)).unwrap().total_seconds(), 90);
    }
}
