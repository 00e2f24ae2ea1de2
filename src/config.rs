//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::dshot::encoder::DshotEncoderConfig;
use crate::dshot::protocol::{DshotSpeed, EscCommand, DSHOT_THROTTLE_MAX};
use crate::dshot::timing::DshotTiming;
use crate::error::{DshotError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub encoder: DshotEncoderConfig,

    #[serde(default)]
    pub channel: ChannelConfig,

    #[serde(default)]
    pub transmit: TransmitConfig,

    #[serde(default)]
    pub capture: CaptureConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Output channel configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    #[serde(default = "default_mem_block_symbols")]
    pub mem_block_symbols: usize,
}

/// Transmission loop configuration
#[derive(Debug, Deserialize, Clone)]
pub struct TransmitConfig {
    #[serde(default = "default_frame_rate_hz")]
    pub frame_rate_hz: u32,

    #[serde(default = "default_throttle")]
    pub throttle: u16,

    #[serde(default)]
    pub telemetry_request: bool,

    #[serde(default = "default_status_interval_frames")]
    pub status_interval_frames: u64,
}

/// Symbol capture configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_capture_path")]
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional log file; empty logs to stdout only
    #[serde(default)]
    pub file: String,
}

// Default value functions
fn default_resolution_hz() -> u32 {
    40_000_000
}
fn default_baud_rate() -> u32 {
    DshotSpeed::DShot600.baud_rate()
}
fn default_post_delay_us() -> u32 {
    50
}

fn default_mem_block_symbols() -> usize {
    48
}

fn default_frame_rate_hz() -> u32 {
    1000
}
fn default_throttle() -> u16 {
    48
}
fn default_status_interval_frames() -> u64 {
    1000
}

fn default_capture_path() -> String {
    "./capture.jsonl".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log levels accepted by `logging.level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            mem_block_symbols: default_mem_block_symbols(),
        }
    }
}

impl Default for TransmitConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: default_frame_rate_hz(),
            throttle: default_throttle(),
            telemetry_request: false,
            status_interval_frames: default_status_interval_frames(),
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_capture_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            encoder: DshotEncoderConfig {
                resolution_hz: default_resolution_hz(),
                baud_rate: default_baud_rate(),
                post_delay_us: default_post_delay_us(),
                bidirectional: false,
            },
            channel: ChannelConfig::default(),
            transmit: TransmitConfig::default(),
            capture: CaptureConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails (including a missing `[encoder]` field)
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dshot_encoder::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Command the transmit loop sends every frame
    pub fn command(&self) -> EscCommand {
        EscCommand::new(self.transmit.throttle, self.transmit.telemetry_request)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.encoder.resolution_hz == 0 {
            return Err(invalid("resolution_hz must be greater than 0"));
        }

        if DshotSpeed::from_baud_rate(self.encoder.baud_rate).is_none() {
            return Err(invalid(
                "baud_rate must be one of: 150000, 300000, 600000, 1200000",
            ));
        }

        // Resolution must leave distinct 0 and 1 bit symbols at this speed
        DshotTiming::compute(
            self.encoder.resolution_hz,
            self.encoder.baud_rate,
            self.encoder.post_delay_us,
        )?;

        if self.channel.mem_block_symbols == 0 || self.channel.mem_block_symbols > 4096 {
            return Err(invalid("mem_block_symbols must be between 1 and 4096"));
        }

        if self.transmit.frame_rate_hz == 0 || self.transmit.frame_rate_hz > 32_000 {
            return Err(invalid("frame_rate_hz must be between 1 and 32000"));
        }

        if self.transmit.throttle > DSHOT_THROTTLE_MAX {
            return Err(invalid("throttle must be between 0 and 2047"));
        }

        if self.transmit.status_interval_frames == 0 {
            return Err(invalid("status_interval_frames must be greater than 0"));
        }

        if self.capture.enabled && self.capture.path.is_empty() {
            return Err(invalid("capture path cannot be empty when enabled"));
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "log level must be one of: trace, debug, info, warn, error",
            ));
        }

        Ok(())
    }
}

fn invalid(msg: &str) -> DshotError {
    DshotError::Config(toml::de::Error::custom(msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_config_from_file() {
        let file = write_config(
            r#"
[encoder]
resolution_hz = 40000000
baud_rate = 300000
post_delay_us = 100
bidirectional = true

[channel]
mem_block_symbols = 64

[transmit]
throttle = 1046
"#,
        );

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.encoder.baud_rate, 300_000);
        assert!(config.encoder.bidirectional);
        assert_eq!(config.channel.mem_block_symbols, 64);
        assert_eq!(config.transmit.throttle, 1046);
        assert_eq!(config.transmit.frame_rate_hz, 1000);
        assert!(!config.capture.enabled);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.command(), EscCommand::new(1046, false));
    }

    #[test]
    fn test_encoder_fields_are_mandatory() {
        let file = write_config(
            r#"
[encoder]
resolution_hz = 40000000
baud_rate = 600000
post_delay_us = 50
"#,
        );

        match Config::load(file.path()) {
            Err(DshotError::Config(e)) => assert!(e.to_string().contains("bidirectional")),
            other => panic!("Expected Config error, got: {:?}", other),
        }
    }

    #[test]
    fn test_missing_encoder_section() {
        let file = write_config("[transmit]\nthrottle = 100\n");
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/dshot-encoder.toml"),
            Err(DshotError::Io(_))
        ));
    }

    #[test]
    fn test_zero_resolution() {
        let mut config = Config::default();
        config.encoder.resolution_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = Config::default();
        config.encoder.baud_rate = 420_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in &[150_000, 300_000, 600_000, 1_200_000] {
            let mut config = Config::default();
            config.encoder.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_resolution_too_coarse_for_speed() {
        // 1.2 MHz at DShot600 leaves 2 ticks per bit: 0 and 1 would look the same
        let mut config = Config::default();
        config.encoder.resolution_hz = 1_200_000;
        match config.validate() {
            Err(DshotError::InvalidArgument(msg)) => assert!(msg.contains("2 ticks")),
            other => panic!("Expected InvalidArgument, got: {:?}", other),
        }

        config.encoder.baud_rate = DshotSpeed::DShot300.baud_rate();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_post_delay_too_long_for_resolution() {
        let mut config = Config::default();
        config.encoder.post_delay_us = 10_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mem_block_zero() {
        let mut config = Config::default();
        config.channel.mem_block_symbols = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_mem_block_too_large() {
        let mut config = Config::default();
        config.channel.mem_block_symbols = 4097;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_rate_zero() {
        let mut config = Config::default();
        config.transmit.frame_rate_hz = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_rate_too_high() {
        let mut config = Config::default();
        config.transmit.frame_rate_hz = 32_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_throttle_too_high() {
        let mut config = Config::default();
        config.transmit.throttle = 2048;
        assert!(config.validate().is_err());

        config.transmit.throttle = 2047;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_status_interval_zero() {
        let mut config = Config::default();
        config.transmit.status_interval_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_capture_path_when_enabled() {
        let mut config = Config::default();
        config.capture.enabled = true;
        config.capture.path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_capture_path_when_disabled() {
        let mut config = Config::default();
        config.capture.enabled = false;
        config.capture.path = String::new();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_functions() {
        assert_eq!(default_resolution_hz(), 40_000_000);
        assert_eq!(default_baud_rate(), 600_000);
        assert_eq!(default_post_delay_us(), 50);
        assert_eq!(default_mem_block_symbols(), 48);
        assert_eq!(default_frame_rate_hz(), 1000);
        assert_eq!(default_throttle(), 48);
        assert_eq!(default_status_interval_frames(), 1000);
        assert_eq!(default_capture_path(), "./capture.jsonl");
        assert_eq!(default_log_level(), "info");
    }
}
