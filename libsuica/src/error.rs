// libsuica/src/error.rs

use crate::types::ServiceCode;
use thiserror::Error;

/// Error reported by the hardware layer for a single request.
///
/// The concrete platform error is opaque to the session engine; only its
/// message is kept for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct HardwareError {
    message: String,
}

impl HardwareError {
    /// Error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The platform's description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<Error> for HardwareError {
    fn from(err: Error) -> Self {
        Self::new(err.to_string())
    }
}

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `start_scan` while another attempt runs.
    #[error("a scan session is already active")]
    SessionAlreadyActive,

    /// The reader session could not be opened.
    #[error("reader unavailable: {0}")]
    ReaderUnavailable(HardwareError),

    /// Connecting to the detected tag failed.
    #[error("tag connection failed: {0}")]
    TagConnectionFailed(HardwareError),

    /// The detected tag is not a FeliCa card.
    #[error("tag does not speak FeliCa")]
    IncompatibleTag,

    /// Request Service failed.
    #[error("service connection failed: {0}")]
    ServiceConnectionFailed(HardwareError),

    /// The card has no such service.
    #[error("service {0} not present on card")]
    ServiceNotPresent(ServiceCode),

    /// Read Without Encryption failed or returned no data.
    #[error("read failed: {0}")]
    ReadFailed(HardwareError),

    /// The card answered the read with non-zero status flags.
    #[error("status flags abnormal: status=({status1:#04x}, {status2:#04x})")]
    StatusFlagsAbnormal {
        /// Status flag 1.
        status1: u8,
        /// Status flag 2.
        status2: u8,
    },

    /// No response within the allowed time.
    #[error("operation timed out")]
    Timeout,

    /// Stopped by the caller.
    #[error("scan cancelled")]
    Cancelled,

    /// The reader ended the session on its own.
    #[error("session invalidated by reader{}", reason_suffix(.0))]
    SessionInvalidated(Option<String>),

    /// The scan service task is gone.
    #[error("scan service stopped")]
    ServiceStopped,

    /// Rejected [`ScanConfig`](crate::session::ScanConfig) setting.
    #[error("invalid scan configuration: {0}")]
    InvalidConfig(&'static str),

    /// Frame or payload shorter or longer than allowed.
    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length seen.
        actual: usize,
    },

    /// LCS or DCS did not match.
    #[error("checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    ChecksumMismatch {
        /// Computed checksum.
        expected: u8,
        /// Checksum in the frame.
        actual: u8,
    },

    /// Malformed frame, or a response from the wrong card.
    #[error("frame format error: {0}")]
    FrameFormat(String),

    /// Response code did not belong to the command sent.
    #[error("unexpected response code: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedResponse {
        /// Command code + 1.
        expected: u8,
        /// Code received.
        actual: u8,
    },
}

impl Error {
    /// Message handed to the reader when this error ends a session.
    ///
    /// `None` means the session ends without a message: the card simply
    /// does not apply, or the caller asked to stop.
    pub fn invalidation_reason(&self) -> Option<&'static str> {
        match self {
            Self::TagConnectionFailed(_) => Some("tag connection failed"),
            Self::ServiceConnectionFailed(_) => Some("service connection failed"),
            Self::ServiceNotPresent(_) => Some("service not present"),
            Self::ReadFailed(_) => Some("read failed"),
            Self::StatusFlagsAbnormal { .. } => Some("status flags abnormal"),
            Self::Timeout => Some("timed out"),
            _ => None,
        }
    }
}

fn reason_suffix(reason: &Option<String>) -> String {
    match reason {
        Some(r) => format!(": {r}"),
        None => String::new(),
    }
}

/// Result with the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
