//! # Print Job Configuration
//!
//! Everything a print run needs: text layout, handshake timing, the
//! hardware link and command framing.
//!
//! ## Sources
//!
//! Settings come from, in increasing priority:
//!
//! 1. Built-in defaults ([`PrintConfig::default`])
//! 2. A JSON config file ([`PrintConfig::load`]); missing keys keep defaults
//! 3. Command-line flags
//!
//! ## Example File
//!
//! ```json
//! {
//!   "columns": 132,
//!   "wrap_policy": "hard_split",
//!   "retry_limit": 20,
//!   "retry_delay_ms": 250,
//!   "device": "/dev/ttyAMA0",
//!   "command": { "marker": 1, "status_code": 16 }
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! use smartparallel::printer::PrintConfig;
//!
//! let config = PrintConfig::from_json(r#"{ "columns": 100 }"#)?;
//! // Unsupported widths fall back to normal mode
//! assert_eq!(config.columns.get(), 80);
//!
//! # Ok::<(), smartparallel::SmartParallelError>(())
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SmartParallelError;
use crate::protocol::CommandSettings;
use crate::text::{ColumnWidth, WrapPolicy};
use crate::transmit::{DEFAULT_RETRY_DELAY, DEFAULT_RETRY_LIMIT, TransmitSettings};
use crate::transport::gpio::DEFAULT_CTS_PIN;
use crate::transport::serial::{DEFAULT_BAUD_RATE, DEFAULT_DEVICE};

/// # Print Configuration
///
/// | Key | Default | Meaning |
/// |-----|---------|---------|
/// | `columns` | 80 | 40, 80 or 132; anything else becomes 80 |
/// | `wrap_policy` | `split_on_space` | `truncate`, `split_on_space` or `hard_split` |
/// | `retry_limit` | 10 | not-ready polls per line before giving up |
/// | `retry_delay_ms` | 500 | sleep between not-ready polls |
/// | `offline_poll_interval_ms` | 0 | sleep while waiting for CTS to drop |
/// | `ignore_blank_lines` | false | reserved, has no effect yet |
/// | `device` | `/dev/ttyS0` | serial device |
/// | `baud_rate` | 19200 | serial speed |
/// | `cts_pin` | 8 | GPIO pin wired to CTS |
/// | `command` | see [`CommandSettings`] | command framing |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintConfig {
    /// Characters per line
    pub columns: ColumnWidth,

    /// How over-long lines are handled
    pub wrap_policy: WrapPolicy,

    /// Not-ready polls allowed per line
    pub retry_limit: u32,

    /// Sleep between not-ready polls, in milliseconds
    pub retry_delay_ms: u64,

    /// Sleep between polls while waiting for the interface to go offline,
    /// in milliseconds. 0 spins.
    pub offline_poll_interval_ms: u64,

    /// Reserved for skipping blank lines; currently has no effect
    pub ignore_blank_lines: bool,

    /// Serial device path
    pub device: String,

    /// Serial baud rate
    pub baud_rate: u32,

    /// GPIO pin carrying CTS
    pub cts_pin: u32,

    /// Command framing and status read settings
    pub command: CommandSettings,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            columns: ColumnWidth::NORMAL,
            wrap_policy: WrapPolicy::SplitOnSpace,
            retry_limit: DEFAULT_RETRY_LIMIT,
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            offline_poll_interval_ms: 0,
            ignore_blank_lines: false,
            device: DEFAULT_DEVICE.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            cts_pin: DEFAULT_CTS_PIN,
            command: CommandSettings::default(),
        }
    }
}

impl PrintConfig {
    /// Load a JSON config file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SmartParallelError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SmartParallelError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse a JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, SmartParallelError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SmartParallelError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde can't.
    pub fn validate(&self) -> Result<(), SmartParallelError> {
        if self.retry_limit == 0 {
            return Err(SmartParallelError::Config(
                "retry_limit must be at least 1".to_string(),
            ));
        }
        if self.command.read_capacity == 0 {
            return Err(SmartParallelError::Config(
                "command.read_capacity must be at least 1".to_string(),
            ));
        }
        if self.device.is_empty() {
            return Err(SmartParallelError::Config("device must not be empty".to_string()));
        }
        Ok(())
    }

    /// Sleep between not-ready polls
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Handshake timing for the transmitter
    pub fn transmit_settings(&self) -> TransmitSettings {
        TransmitSettings {
            retry_limit: self.retry_limit,
            retry_delay: self.retry_delay(),
            offline_poll_interval: Duration::from_millis(self.offline_poll_interval_ms),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
