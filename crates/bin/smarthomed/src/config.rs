//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `smarthome.toml` in the working directory (or the path in
//! `SMARTHOME_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;
use smarthome_domain::device::DeviceStatus;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Virtual sensor settings.
    pub sensor: SensorConfig,
    /// Background trigger polling.
    pub polling: PollingConfig,
    /// Devices registered at startup, in order. Ids follow this order.
    pub devices: Vec<DeviceConfig>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Virtual thermometer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Reading reported until it is changed with `:temp`.
    pub initial_temperature: f64,
}

/// Periodic re-evaluation of every trigger.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between evaluations; `0` disables polling.
    pub interval_secs: u64,
}

/// One device to register at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    pub kind: String,
    #[serde(default)]
    pub status: DeviceStatus,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("SMARTHOME_CONFIG").unwrap_or_else(|_| "smarthome.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SMARTHOME_TEMPERATURE") {
            if let Ok(temperature) = val.parse() {
                self.sensor.initial_temperature = temperature;
            }
        }
        if let Ok(val) = std::env::var("SMARTHOME_POLL_INTERVAL") {
            if let Ok(secs) = val.parse() {
                self.polling.interval_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("SMARTHOME_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.sensor.initial_temperature.is_finite() {
            return Err(ConfigError::Validation(
                "initial_temperature must be a finite number".to_string(),
            ));
        }
        if let Some(index) = self.devices.iter().position(|d| d.kind.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "device #{index} has an empty kind"
            )));
        }
        Ok(())
    }

    /// Polling period, or `None` when polling is disabled.
    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        (self.polling.interval_secs > 0).then(|| Duration::from_secs(self.polling.interval_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        let device = |kind: &str| DeviceConfig {
            kind: kind.to_string(),
            status: DeviceStatus::Off,
        };
        Self {
            logging: LoggingConfig::default(),
            sensor: SensorConfig::default(),
            polling: PollingConfig::default(),
            devices: vec![device("light"), device("lock"), device("heater")],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthomed=info,smarthome=info".to_string(),
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 21.5,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
