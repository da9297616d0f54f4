// libsuica/src/utils/timeout.rs

//! Timeout defaults for transports and the scan service.

use std::time::Duration;

/// How long a transport waits for a card to answer one command.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1000;

/// Interval between Polling commands while a session waits for a card.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

/// Convert milliseconds to Duration.
pub fn ms(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

/// [`DEFAULT_READ_TIMEOUT_MS`] as a Duration.
pub fn default_read_timeout() -> Duration {
    ms(DEFAULT_READ_TIMEOUT_MS)
}

/// [`DEFAULT_POLL_INTERVAL_MS`] as a Duration.
pub fn default_poll_interval() -> Duration {
    ms(DEFAULT_POLL_INTERVAL_MS)
}

/// Duration as whole milliseconds, saturating instead of truncating on overflow.
pub fn as_millis_u64(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
