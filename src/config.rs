//! Configuration management for CEZ HDO
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

use crate::error::{HdoError, Result};
use crate::schedule::Signal;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Provider API and metering point
    pub hdo: HdoConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// How often the coordinator asks the client for data, in seconds
    pub scan_interval_secs: u64,

    /// IANA timezone the provider's dates and clock times are expressed in
    pub timezone: String,
}

/// Provider API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HdoConfig {
    /// EAN of the metering point
    pub ean: String,

    /// Switching signal the meter is subscribed to
    pub signal: Signal,

    /// Base URL of the switch-times portal
    pub base_url: String,

    /// Value of the `path` query parameter
    pub endpoint: String,

    /// Total request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Optional override for console output
    pub console_level: Option<String>,

    /// Optional override for file output
    pub file_level: Option<String>,

    /// Path to log file (or directory)
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "cez_hdo.yaml",
            "/data/cez_hdo.yaml",
            "/etc/cez-hdo/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|_| {
            let msg = format!("Unknown timezone '{}'", self.timezone);
            HdoError::validation("timezone", msg.as_str())
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let ean = self.hdo.ean.trim();
        if ean.is_empty() {
            return Err(HdoError::validation("hdo.ean", "EAN cannot be empty"));
        }
        if !ean.chars().all(|c| c.is_ascii_digit()) {
            return Err(HdoError::validation(
                "hdo.ean",
                "EAN must contain digits only",
            ));
        }

        if self.hdo.base_url.trim().is_empty() {
            return Err(HdoError::validation(
                "hdo.base_url",
                "Base URL cannot be empty",
            ));
        }

        if self.hdo.timeout_secs == 0 {
            return Err(HdoError::validation(
                "hdo.timeout_secs",
                "Must be greater than 0",
            ));
        }

        if self.scan_interval_secs == 0 {
            return Err(HdoError::validation(
                "scan_interval_secs",
                "Must be greater than 0",
            ));
        }

        self.tz()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        let mut config = Config::default();
        config.hdo.ean = "85918234567890".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.scan_interval_secs, 30);
        assert_eq!(config.hdo.timeout_secs, 30);
        assert_eq!(config.hdo.signal, Signal::A3b4dp01);
        assert_eq!(config.timezone, "Europe/Prague");
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid();
        assert!(config.validate().is_ok());

        // Default config has no EAN
        assert!(Config::default().validate().is_err());

        config.hdo.ean = "8591-x".to_string();
        assert!(config.validate().is_err());

        config = valid();
        config.scan_interval_secs = 0;
        assert!(config.validate().is_err());

        config = valid();
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = valid();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.hdo.ean, deserialized.hdo.ean);
        assert_eq!(config.hdo.signal, deserialized.hdo.signal);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "hdo:\n  ean: \"123\"\n  signal: a3b4dp06\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.hdo.signal, Signal::A3b4dp06);
        assert_eq!(config.hdo.endpoint, "switch-times/signals");
        assert_eq!(config.scan_interval_secs, 30);
    }
}
