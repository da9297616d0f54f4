// libsuica/src/session/config.rs

use std::time::Duration;

use crate::constants::{DEFAULT_ALERT_MESSAGE, MAX_BLOCKS_PER_READ, SUICA_HISTORY_BLOCKS};
use crate::types::{PollingMode, ServiceCode};
use crate::utils::default_poll_interval;
use crate::{Error, Result};

/// Settings for scan attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScanConfig {
    /// Tag technology the reader is asked to poll for.
    pub polling_mode: PollingMode,
    /// Text the platform shows while waiting for a card.
    pub alert_message: String,
    /// Service holding the history blocks.
    pub service_code: ServiceCode,
    /// Number of history blocks requested in the single read; only the
    /// first is decoded. At most [`MAX_BLOCKS_PER_READ`].
    pub history_blocks: u8,
    /// How often the scan service asks the reader to poll while scanning.
    pub poll_interval: Duration,
    /// Upper bound on each connect / request-service / read completion.
    /// `None` waits indefinitely.
    pub command_timeout: Option<Duration>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            polling_mode: PollingMode::Iso18092,
            alert_message: DEFAULT_ALERT_MESSAGE.to_string(),
            service_code: ServiceCode::SUICA_HISTORY,
            history_blocks: SUICA_HISTORY_BLOCKS,
            poll_interval: default_poll_interval(),
            command_timeout: None,
        }
    }
}

impl ScanConfig {
    /// Start a [`ScanConfigBuilder`] from the defaults.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::new()
    }

    /// Reject settings no scan attempt could run with.
    pub fn validate(&self) -> Result<()> {
        if self.history_blocks == 0 {
            return Err(Error::InvalidConfig("history_blocks must be at least 1"));
        }
        if self.history_blocks > MAX_BLOCKS_PER_READ {
            return Err(Error::InvalidConfig(
                "history_blocks exceeds the per-read block limit",
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(Error::InvalidConfig("poll_interval must be non-zero"));
        }
        if self.command_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfig("command_timeout must be non-zero"));
        }
        Ok(())
    }
}

/// Builder for [`ScanConfig`], starting from the defaults.
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Same as [`ScanConfig::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag technology to poll for.
    pub fn polling_mode(mut self, mode: PollingMode) -> Self {
        self.config.polling_mode = mode;
        self
    }

    /// Text shown while waiting for a card.
    pub fn alert_message(mut self, message: impl Into<String>) -> Self {
        self.config.alert_message = message.into();
        self
    }

    /// Service to read history from.
    pub fn service_code(mut self, service: ServiceCode) -> Self {
        self.config.service_code = service;
        self
    }

    /// Blocks requested per read, `1..=MAX_BLOCKS_PER_READ`.
    pub fn history_blocks(mut self, count: u8) -> Self {
        self.config.history_blocks = count;
        self
    }

    /// Delay between polls while scanning.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Bound each hardware completion by `timeout`.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.config.command_timeout = Some(timeout);
        self
    }

    /// Validate and return the config.
    pub fn build(self) -> Result<ScanConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
