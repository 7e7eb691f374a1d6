//! Player tunables.
//!
//! Resolved from defaults, then an optional TOML file, then `MARQUEE_*`
//! environment variables. Durations are written human-readably
//! (`"10s"`, `"3000ms"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const ENV_LOAD_TIMEOUT: &str = "MARQUEE_LOAD_TIMEOUT";
pub const ENV_CONTROLS_HIDE_DELAY: &str = "MARQUEE_CONTROLS_HIDE_DELAY";
pub const ENV_SEEK_STEP: &str = "MARQUEE_SEEK_STEP";
pub const ENV_VOLUME_STEP: &str = "MARQUEE_VOLUME_STEP";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid duration for {key}: '{value}': {source}")]
    InvalidDuration {
        key: String,
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    #[error("invalid number for {key}: '{value}'")]
    InvalidNumber { key: String, value: String },

    #[error("{key} out of range: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// How long a source may take to resolve its metadata.
    #[serde(with = "duration_str")]
    pub load_timeout: Duration,

    /// Idle time before the overlay hides during playback.
    #[serde(with = "duration_str")]
    pub controls_hide_delay: Duration,

    #[serde(with = "duration_str")]
    pub notification_ttl: Duration,

    /// Seconds moved by the seek buttons and arrow keys.
    pub seek_step_secs: f64,

    pub volume_step: f64,

    pub initial_volume: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            load_timeout: Duration::from_secs(10),
            controls_hide_delay: Duration::from_millis(3000),
            notification_ttl: Duration::from_secs(3),
            seek_step_secs: 10.0,
            volume_step: 0.1,
            initial_volume: 1.0,
        }
    }
}

impl PlayerConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: PlayerConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Full resolution: file (if any), then environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };
        base.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `MARQUEE_*` overrides read through `lookup`.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_LOAD_TIMEOUT) {
            self.load_timeout = parse_duration(ENV_LOAD_TIMEOUT, &value)?;
        }
        if let Some(value) = lookup(ENV_CONTROLS_HIDE_DELAY) {
            self.controls_hide_delay = parse_duration(ENV_CONTROLS_HIDE_DELAY, &value)?;
        }
        if let Some(value) = lookup(ENV_SEEK_STEP) {
            self.seek_step_secs = parse_number(ENV_SEEK_STEP, &value)?;
        }
        if let Some(value) = lookup(ENV_VOLUME_STEP) {
            self.volume_step = parse_number(ENV_VOLUME_STEP, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, duration) in [
            ("load_timeout", self.load_timeout),
            ("controls_hide_delay", self.controls_hide_delay),
            ("notification_ttl", self.notification_ttl),
        ] {
            if duration.is_zero() {
                return Err(ConfigError::OutOfRange {
                    key,
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        if !(self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0) {
            return Err(ConfigError::OutOfRange {
                key: "seek_step_secs",
                reason: format!("{} is not a positive number of seconds", self.seek_step_secs),
            });
        }
        if !(self.volume_step > 0.0 && self.volume_step <= 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "volume_step",
                reason: format!("{} is not within (0, 1]", self.volume_step),
            });
        }
        if !(0.0..=1.0).contains(&self.initial_volume) {
            return Err(ConfigError::OutOfRange {
                key: "initial_volume",
                reason: format!("{} is not within [0, 1]", self.initial_volume),
            });
        }
        Ok(())
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value.trim()).map_err(|source| ConfigError::InvalidDuration {
        key: key.to_string(),
        value: value.to_string(),
        source,
    })
}

fn parse_number(key: &str, value: &str) -> Result<f64, ConfigError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| ConfigError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        })
}

mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = PlayerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.load_timeout, Duration::from_secs(10));
        assert_eq!(config.controls_hide_delay, Duration::from_millis(3000));
    }

    #[test]
    fn parses_human_readable_durations() {
        let config = PlayerConfig::from_toml_str(
            r#"
            load_timeout = "15s"
            controls_hide_delay = "2500ms"
            seek_step_secs = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.load_timeout, Duration::from_secs(15));
        assert_eq!(config.controls_hide_delay, Duration::from_millis(2500));
        assert_eq!(config.seek_step_secs, 5.0);
        assert_eq!(config.volume_step, 0.1);
    }

    #[test]
    fn rejects_unknown_keys_and_bad_values() {
        assert!(matches!(
            PlayerConfig::from_toml_str("volume = 3"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PlayerConfig::from_toml_str("volume_step = 1.5"),
            Err(ConfigError::OutOfRange { key: "volume_step", .. })
        ));
        assert!(matches!(
            PlayerConfig::from_toml_str(r#"load_timeout = "soon""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn environment_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_LOAD_TIMEOUT, "30s"),
            (ENV_VOLUME_STEP, "0.05"),
        ]);

        let config = PlayerConfig::default()
            .with_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.load_timeout, Duration::from_secs(30));
        assert_eq!(config.volume_step, 0.05);
        assert_eq!(config.seek_step_secs, 10.0);
    }

    #[test]
    fn environment_errors_name_the_variable() {
        let err = PlayerConfig::default()
            .with_overrides(|key| (key == ENV_SEEK_STEP).then(|| "ten".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_SEEK_STEP));
    }

    #[test]
    fn round_trips_through_toml() {
        let config = PlayerConfig::default();
        let raw = toml::to_string(&config).unwrap();
        assert_eq!(PlayerConfig::from_toml_str(&raw).unwrap(), config);
    }
}
