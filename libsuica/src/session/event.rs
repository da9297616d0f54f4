// libsuica/src/session/event.rs

use derive_more::Display;
use log::debug;
use tokio::sync::mpsc;

use crate::card::DetectedTag;
use crate::error::HardwareError;
use crate::protocol::ReadResponse;
use crate::types::KeyVersion;

/// Identifies one scan attempt. Completions carry the id of the attempt
/// that issued the command so that stragglers can be told apart.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "#{}", _0)]
pub struct SessionId(u64);

impl SessionId {
    /// Wrap a raw id.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Notification delivered by the hardware layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Candidates in detection order. May be empty.
    TagsDetected(Vec<DetectedTag>),
    /// Outcome of connecting to the tag.
    Connected(Result<(), HardwareError>),
    /// Key version per requested service, in request order.
    ServiceResponded(Result<Vec<KeyVersion>, HardwareError>),
    /// Outcome of the block read.
    ReadCompleted(Result<ReadResponse, HardwareError>),
    /// The hardware session ended, with the reason it was given.
    Invalidated(Option<String>),
}

impl EventKind {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TagsDetected(_) => "tags-detected",
            Self::Connected(_) => "connect completion",
            Self::ServiceResponded(_) => "request-service completion",
            Self::ReadCompleted(_) => "read completion",
            Self::Invalidated(_) => "invalidated",
        }
    }
}

/// A notification tagged with the attempt it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    /// Attempt that issued the request.
    pub session: SessionId,
    /// What happened.
    pub kind: EventKind,
}

impl SessionEvent {
    /// Tag `kind` with `session`.
    pub fn new(session: SessionId, kind: EventKind) -> Self {
        Self { session, kind }
    }
}

/// Sending half of the completion queue handed to the hardware layer.
///
/// Delivery never blocks and may happen from any thread.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    /// A sink and the receiver the session owner drains.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue a completion. Returns false when nobody listens any more.
    pub fn deliver(&self, session: SessionId, kind: EventKind) -> bool {
        match self.tx.send(SessionEvent::new(session, kind)) {
            Ok(()) => true,
            Err(mpsc::error::SendError(event)) => {
                debug!(
                    "dropping {} for session {}: receiver closed",
                    event.kind.name(),
                    event.session
                );
                false
            }
        }
    }
}
