//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{GloveBridgeError, Result};

/// Baud rates the glove firmware can be built for
pub const SUPPORTED_BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub recognizer: RecognizerConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Servo frame transmission configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TelemetryConfig {
    #[serde(default = "default_telemetry_enabled")]
    pub enabled: bool,

    #[serde(default = "default_send_interval_ms")]
    pub send_interval_ms: u64,

    /// Send CR LF after each frame
    #[serde(default)]
    pub append_crlf: bool,

    /// Frames between status log messages
    #[serde(default = "default_status_every")]
    pub status_every: u64,
}

/// Gesture polling loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RecognizerConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_slow_threshold_ms")]
    pub slow_threshold_ms: u64,

    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

/// Gesture model and output file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct GestureConfig {
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,

    #[serde(default = "default_mapping_path")]
    pub mapping_path: PathBuf,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

/// Log file configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Directory for rolling log files; console only when unset
    #[serde(default)]
    pub directory: Option<PathBuf>,

    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyS1".to_string() }
fn default_baud_rate() -> u32 { 9600 }
fn default_timeout_ms() -> u64 { 1000 }

fn default_telemetry_enabled() -> bool { true }
fn default_send_interval_ms() -> u64 { 800 }
fn default_status_every() -> u64 { 100 }

fn default_poll_interval_ms() -> u64 { 100 }
fn default_slow_threshold_ms() -> u64 { 50 }
fn default_backoff_factor() -> f64 { 1.2 }

fn default_model_path() -> PathBuf { PathBuf::from("model.json") }
fn default_mapping_path() -> PathBuf { PathBuf::from("sign_mapping.json") }
fn default_output_path() -> PathBuf { PathBuf::from("output.txt") }

fn default_file_prefix() -> String { "glove-bridge.log".to_string() }

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: default_telemetry_enabled(),
            send_interval_ms: default_send_interval_ms(),
            append_crlf: false,
            status_every: default_status_every(),
        }
    }
}

impl TelemetryConfig {
    pub fn send_interval(&self) -> Duration {
        Duration::from_millis(self.send_interval_ms)
    }
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            slow_threshold_ms: default_slow_threshold_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            mapping_path: default_mapping_path(),
            output_path: default_output_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> GloveBridgeError {
    GloveBridgeError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use glove_bridge::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Validate serial port configuration
        if self.serial.port.is_empty() {
            return Err(invalid("serial port cannot be empty"));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(invalid(format!(
                "baud_rate must be one of: {:?}",
                SUPPORTED_BAUD_RATES
            )));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        // Validate telemetry timing
        if self.telemetry.send_interval_ms == 0 || self.telemetry.send_interval_ms > 60000 {
            return Err(invalid("send_interval_ms must be between 1 and 60000"));
        }

        if self.telemetry.status_every == 0 {
            return Err(invalid("status_every must be greater than 0"));
        }

        // Validate recognizer polling
        if self.recognizer.poll_interval_ms == 0 || self.recognizer.poll_interval_ms > 10000 {
            return Err(invalid("poll_interval_ms must be between 1 and 10000"));
        }

        if !(1.0..=10.0).contains(&self.recognizer.backoff_factor) {
            return Err(invalid("backoff_factor must be between 1.0 and 10.0"));
        }

        // Validate file paths
        for (name, path) in [
            ("model_path", &self.gesture.model_path),
            ("mapping_path", &self.gesture.mapping_path),
            ("output_path", &self.gesture.output_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(invalid(format!("{} cannot be empty", name)));
            }
        }

        if self.logging.directory.is_some() && self.logging.file_prefix.is_empty() {
            return Err(invalid("logging file_prefix cannot be empty when directory is set"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.serial.port, "/dev/ttyS1");
        assert_eq!(config.serial.baud_rate, 9600);
        assert_eq!(config.telemetry.send_interval(), Duration::from_millis(800));
        assert!(!config.telemetry.append_crlf);
        assert_eq!(config.gesture.output_path, PathBuf::from("output.txt"));
        assert!(config.logging.directory.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let toml_content = r#"
[serial]
port = "/dev/ttyUSB0"
baud_rate = 115200

[telemetry]
append_crlf = true

[recognizer]

[gesture]
model_path = "models/glove.json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = Config::load(temp_file.path()).unwrap();
        assert_eq!(config.serial.port, "/dev/ttyUSB0");
        assert_eq!(config.serial.baud_rate, 115200);
        assert!(config.telemetry.append_crlf);
        assert_eq!(config.gesture.model_path, PathBuf::from("models/glove.json"));
        assert_eq!(config.gesture.mapping_path, PathBuf::from("sign_mapping.json"));
    }

    #[test]
    fn test_shipped_default_file_is_valid() {
        let config = Config::from_toml(include_str!("../config/default.toml")).unwrap();
        assert_eq!(config.telemetry.send_interval_ms, 800);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/glove-bridge.toml");
        assert!(matches!(result, Err(GloveBridgeError::Io(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_toml("[serial]\nbaud_rate = \"fast\"");
        assert!(matches!(result, Err(GloveBridgeError::Config(_))));
    }

    #[test]
    fn test_empty_serial_port() {
        let mut config = Config::default();
        config.serial.port = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = Config::default();
        config.serial.baud_rate = 420000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in &SUPPORTED_BAUD_RATES {
            let mut config = Config::default();
            config.serial.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_timeout_ms_zero() {
        let mut config = Config::default();
        config.serial.timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_ms_too_high() {
        let mut config = Config::default();
        config.serial.timeout_ms = 10001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_send_interval_zero() {
        let mut config = Config::default();
        config.telemetry.send_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_send_interval_too_high() {
        let mut config = Config::default();
        config.telemetry.send_interval_ms = 60001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_status_every_zero() {
        let mut config = Config::default();
        config.telemetry.status_every = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_poll_interval_zero() {
        let mut config = Config::default();
        config.recognizer.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_factor_out_of_range() {
        let mut config = Config::default();
        config.recognizer.backoff_factor = 0.5;
        assert!(config.validate().is_err());

        config.recognizer.backoff_factor = 11.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_output_path() {
        let mut config = Config::default();
        config.gesture.output_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_prefix_with_directory() {
        let mut config = Config::default();
        config.logging.directory = Some(PathBuf::from("./logs"));
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_prefix_without_directory() {
        let mut config = Config::default();
        config.logging.file_prefix = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_serial_port(), "/dev/ttyS1");
        assert_eq!(default_baud_rate(), 9600);
        assert_eq!(default_timeout_ms(), 1000);
        assert_eq!(default_telemetry_enabled(), true);
        assert_eq!(default_send_interval_ms(), 800);
        assert_eq!(default_status_every(), 100);
        assert_eq!(default_poll_interval_ms(), 100);
        assert_eq!(default_slow_threshold_ms(), 50);
        assert_eq!(default_backoff_factor(), 1.2);
        assert_eq!(default_model_path(), PathBuf::from("model.json"));
        assert_eq!(default_mapping_path(), PathBuf::from("sign_mapping.json"));
        assert_eq!(default_file_prefix(), "glove-bridge.log");
    }
}
