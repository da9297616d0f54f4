// libsuica/src/session/mod.rs

//! Tag-session engine: one scan attempt from discovery to a decoded record.
//!
//! The hardware layer reports every asynchronous completion as a
//! [`SessionEvent`] through an [`EventSink`]; whoever owns the
//! [`SessionController`] feeds those events back in, one at a time. The
//! [`ScanService`] actor does exactly that on a tokio runtime.

mod config;
mod controller;
mod event;
mod hardware;
mod service;

pub use config::{ScanConfig, ScanConfigBuilder};
pub use controller::{ResultCallback, ScanOutcome, SessionController, Transition};
pub use event::{EventKind, EventSink, SessionEvent, SessionId};
pub use hardware::TagHardware;
pub use service::{ScanHandle, ScanService};

use derive_more::Display;

/// Lifecycle of one scan attempt.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// No attempt running.
    Idle,
    /// Reader session open, waiting for a tag.
    Scanning,
    /// Connecting to the detected tag.
    Connecting,
    /// Waiting for the key versions of the history service.
    ServiceRequesting,
    /// Waiting for the history blocks.
    BlockReading,
    /// Final state of an attempt.
    ///
    /// [`SessionController::state`] never reports it: the attempt is
    /// dropped as it ends, so the state reads [`ScanState::Idle`] again.
    /// Callers observe the end through [`Transition::Terminated`].
    Terminated,
}

impl ScanState {
    /// True while a hardware command is outstanding.
    pub fn is_awaiting_completion(&self) -> bool {
        matches!(
            self,
            Self::Connecting | Self::ServiceRequesting | Self::BlockReading
        )
    }
}
