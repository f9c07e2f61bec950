//! Configuration system using Figment
//!
//! Configuration is loaded from:
//! 1. `config/serial_scope.toml` (base configuration, optional)
//! 2. Environment variables prefixed with `SERIAL_SCOPE_`, nested keys split on `__`
//!
//! # Example
//! ```no_run
//! use serial_scope::config::ScopeConfig;
//!
//! let config = ScopeConfig::load()?;
//! println!("Console keeps {} entries", config.engine.max_console_entries);
//! # Ok::<(), figment::Error>(())
//! ```

use crate::core::Channel;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/serial_scope.toml";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Buffer and cap settings for the aggregation engine
    #[serde(default)]
    pub engine: EngineConfig,
    /// Message input settings
    #[serde(default)]
    pub input: InputConfig,
    /// Serial port settings for device input
    #[serde(default)]
    pub serial: SerialConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Application name
    #[serde(default = "default_name")]
    pub name: String,
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Caps enforced by the aggregation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// A pending console line longer than this is force-flushed as a partial line
    #[serde(default = "default_max_console_line_length")]
    pub max_console_line_length: usize,
    /// Maximum number of console entries kept in scrollback
    #[serde(default = "default_max_console_entries")]
    pub max_console_entries: usize,
    /// Maximum number of characters kept in the raw transcript
    #[serde(default = "default_max_raw_buffer_length")]
    pub max_raw_buffer_length: usize,
    /// Maximum number of points kept per series
    #[serde(default = "default_max_series_points")]
    pub max_series_points: usize,
    /// Number of distinct line styles handed out to series
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,
}

/// Message input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Channel accepted at startup
    #[serde(default)]
    pub channel: Channel,
    /// Directory the raw transcript is exported to
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

/// Serial port configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Port path (e.g. "/dev/ttyACM0", "COM3")
    #[serde(default)]
    pub port: Option<String>,
    /// Communication speed
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Source id attached to messages read from the port; defaults to the port path
    #[serde(default)]
    pub source_id: Option<String>,
}

// Default value functions
fn default_name() -> String {
    "serial-scope".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_console_line_length() -> usize {
    500
}

fn default_max_console_entries() -> usize {
    100
}

fn default_max_raw_buffer_length() -> usize {
    5000
}

fn default_max_series_points() -> usize {
    10_000
}

fn default_palette_size() -> usize {
    4
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_baud_rate() -> u32 {
    115_200
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_console_line_length: default_max_console_line_length(),
            max_console_entries: default_max_console_entries(),
            max_raw_buffer_length: default_max_raw_buffer_length(),
            max_series_points: default_max_series_points(),
            palette_size: default_palette_size(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            export_dir: default_export_dir(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: default_baud_rate(),
            source_id: None,
        }
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            application: ApplicationConfig::default(),
            engine: EngineConfig::default(),
            input: InputConfig::default(),
            serial: SerialConfig::default(),
        }
    }
}

impl ScopeConfig {
    /// Load configuration from the default file and environment variables
    ///
    /// Environment variables override file values with prefix `SERIAL_SCOPE_`.
    /// Example: `SERIAL_SCOPE_ENGINE__MAX_CONSOLE_ENTRIES=250`
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    ///
    /// A missing file is not an error; built-in defaults fill every key.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, figment::Error> {
        Self::figment(path.as_ref()).extract()
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ScopeConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SERIAL_SCOPE_").split("__"))
    }

    /// Render the configuration as TOML, e.g. to seed a config file
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.application.log_level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                valid_levels.join(", ")
            ));
        }

        let caps = [
            ("max_console_line_length", self.engine.max_console_line_length),
            ("max_console_entries", self.engine.max_console_entries),
            ("max_raw_buffer_length", self.engine.max_raw_buffer_length),
            ("max_series_points", self.engine.max_series_points),
            ("palette_size", self.engine.palette_size),
        ];
        for (name, value) in caps {
            if value == 0 {
                return Err(format!("Invalid engine.{name}: must be greater than 0"));
            }
        }

        if self.serial.baud_rate == 0 {
            return Err("Invalid serial.baud_rate: must be greater than 0".to_string());
        }

        if let Some(port) = &self.serial.port {
            if port.trim().is_empty() {
                return Err("serial.port cannot be empty when set".to_string());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = ScopeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.max_console_line_length, 500);
        assert_eq!(config.engine.max_console_entries, 100);
        assert_eq!(config.engine.max_raw_buffer_length, 5000);
        assert_eq!(config.input.channel, Channel::Simulator);
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = ScopeConfig::default();
        config.application.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("loud"));
    }

    #[test]
    fn zero_caps_are_rejected() {
        let mut config = ScopeConfig::default();
        config.engine.max_console_entries = 0;
        let err = config.validate().unwrap_err();
        assert!(err.contains("max_console_entries"));

        let mut config = ScopeConfig::default();
        config.engine.palette_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_serial_port_is_rejected() {
        let mut config = ScopeConfig::default();
        config.serial.port = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_rendering_round_trips_through_figment() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scope.toml");

        let mut config = ScopeConfig::default();
        config.engine.max_console_entries = 42;
        config.input.channel = Channel::Device;
        std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

        let loaded = ScopeConfig::load_from(&path).unwrap();
        assert_eq!(loaded.engine.max_console_entries, 42);
        assert_eq!(loaded.input.channel, Channel::Device);
    }
}
