//! Configuration management for keystate
//!
//! Settings are read from an optional config file; command-line flags
//! override them.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/keystate/config.toml` |
//! | macOS | `~/Library/Application Support/keystate/config.toml` |
//! | Windows | `%APPDATA%\keystate\config.toml` |
//!
//! ## Example
//!
//! ```no_run
//! use keystate::Config;
//!
//! // Load existing config or use defaults
//! let mut config = Config::load().unwrap_or_default();
//!
//! // Poll every 10ms
//! config.monitor.polling_rate_ms = 10;
//! config.validate().expect("polling rate in range");
//! ```

use crate::input::Backend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Allowed polling interval, in milliseconds
pub const POLLING_RATE_RANGE: std::ops::RangeInclusive<u64> = 1..=1000;

/// Error type for configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Polling interval outside 1-1000
    #[error("Polling-Rate must be an integer from 1-1000 (got {0})")]
    InvalidPollingRate(u64),
}

/// Returns the path to the config file.
///
/// Unlike saving, looking the path up never creates directories.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(config_dir.join("keystate").join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Sampling settings
    #[serde(default)]
    pub monitor: MonitorConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Sampling loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitorConfig {
    /// Interval between samples in milliseconds (1-1000)
    pub polling_rate_ms: u64,
    /// Input backend
    pub backend: Backend,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            polling_rate_ms: 5,
            backend: Backend::Auto,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the system information header at startup
    pub display_info: bool,
    /// Folder where log files are created
    pub logfile_dir: PathBuf,
    /// Append `_NNN` code suffixes to key labels
    pub show_codes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            display_info: true,
            logfile_dir: PathBuf::from("logs"),
            show_codes: false,
        }
    }
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or the
    /// platform has no config directory.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Ok(path) => Self::load_optional(Some(&path)),
            Err(ConfigError::NoConfigDir) => {
                log::warn!("no config directory on this platform, using defaults");
                Self::load_optional(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Load `path` if it names an existing file, defaults otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::load_from(path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = self.monitor.polling_rate_ms;
        if !POLLING_RATE_RANGE.contains(&rate) {
            return Err(ConfigError::InvalidPollingRate(rate));
        }
        Ok(())
    }

    /// Get the polling interval as Duration
    pub fn polling_interval(&self) -> Duration {
        Duration::from_millis(self.monitor.polling_rate_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("keystate-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.monitor.polling_rate_ms, 5);
        assert_eq!(config.monitor.backend, Backend::Auto);
        assert!(config.output.display_info);
        assert_eq!(config.output.logfile_dir, PathBuf::from("logs"));
        assert!(!config.output.show_codes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_polling_interval() {
        let mut config = Config::default();
        assert_eq!(config.polling_interval(), Duration::from_millis(5));
        config.monitor.polling_rate_ms = 1000;
        assert_eq!(config.polling_interval(), Duration::from_secs(1));
    }

    #[test]
    fn validate_rejects_out_of_range_rates() {
        let mut config = Config::default();
        for rate in [0, 1001, 60_000] {
            config.monitor.polling_rate_ms = rate;
            match config.validate() {
                Err(ConfigError::InvalidPollingRate(r)) => assert_eq!(r, rate),
                other => panic!("expected InvalidPollingRate, got {:?}", other),
            }
        }
        for rate in [1, 500, 1000] {
            config.monitor.polling_rate_ms = rate;
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.monitor.polling_rate_ms = 20;
        config.monitor.backend = Backend::DeviceQuery;
        config.output.show_codes = true;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(matches!(Config::load_from(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn config_deserializes_partial_toml() {
        let toml_str = r#"
[monitor]
polling_rate_ms = 15
backend = "evdev"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.monitor.polling_rate_ms, 15);
        assert_eq!(config.monitor.backend, Backend::Evdev);
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn partial_sections_fill_in_missing_keys() {
        let config: Config =
            toml::from_str("[output]\nshow_codes = true\n").expect("Failed to deserialize");
        assert!(config.output.show_codes);
        assert!(config.output.display_info);
        assert_eq!(config.output.logfile_dir, PathBuf::from("logs"));
        assert_eq!(config.monitor, MonitorConfig::default());

        let config: Config =
            toml::from_str("[monitor]\nbackend = \"evdev\"\n").expect("Failed to deserialize");
        assert_eq!(config.monitor.backend, Backend::Evdev);
        assert_eq!(config.monitor.polling_rate_ms, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_location_yields_defaults() {
        assert_eq!(Config::load_optional(None).unwrap(), Config::default());
        let absent = PathBuf::from("/nonexistent/keystate/config.toml");
        assert_eq!(Config::load_optional(Some(&absent)).unwrap(), Config::default());
    }

    #[test]
    fn config_rejects_non_numeric_rate() {
        let toml_str = "[monitor]\npolling_rate_ms = \"fast\"\n";
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let toml_str = toml::to_string_pretty(&Config::default()).expect("Failed to serialize");
        assert!(toml_str.contains("[monitor]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("polling_rate_ms = 5"));
        assert!(toml_str.contains("backend = \"auto\""));
    }

    #[test]
    fn config_error_display() {
        assert_eq!(
            ConfigError::NoConfigDir.to_string(),
            "Could not determine config directory"
        );
        assert!(ConfigError::InvalidPollingRate(0)
            .to_string()
            .starts_with("Polling-Rate must be an integer from 1-1000"));
    }

    #[test]
    fn config_path_names_the_app() {
        if let Ok(path) = config_path() {
            assert!(path.to_string_lossy().contains("keystate"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
