// libsuica/src/session/hardware.rs

use crate::card::{DetectedTag, FelicaTag};
use crate::error::HardwareError;
use crate::session::SessionId;
use crate::types::{BlockReference, PollingMode, ServiceCode};

/// Wireless reader as seen by the session engine.
///
/// Every method except `begin_session` only *issues* the request; its
/// completion arrives later as a [`crate::session::SessionEvent`] through
/// the [`crate::session::EventSink`] the implementation was built with.
/// The engine never issues a command before the previous one completed.
pub trait TagHardware {
    /// Open a reader session polling with `mode`. The session yields zero or
    /// more `TagsDetected` events and exactly one `Invalidated` event.
    fn begin_session(
        &mut self,
        session: SessionId,
        mode: PollingMode,
        alert_message: &str,
    ) -> Result<(), HardwareError>;

    /// Look for tags in the field. Readers that poll on their own (platform
    /// NFC stacks) leave this as a no-op.
    fn poll(&mut self, _session: SessionId) {}

    /// Completes with `Connected`.
    fn connect(&mut self, session: SessionId, tag: &DetectedTag);

    /// Completes with `ServiceResponded`.
    fn request_service(&mut self, session: SessionId, tag: &FelicaTag, service: ServiceCode);

    /// Completes with `ReadCompleted`.
    fn read_without_encryption(
        &mut self,
        session: SessionId,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    );

    /// End the session, showing `reason` to the user when given.
    fn invalidate(&mut self, session: SessionId, reason: Option<&str>);
}

impl<H: TagHardware + ?Sized> TagHardware for Box<H> {
    fn begin_session(
        &mut self,
        session: SessionId,
        mode: PollingMode,
        alert_message: &str,
    ) -> Result<(), HardwareError> {
        (**self).begin_session(session, mode, alert_message)
    }

    fn poll(&mut self, session: SessionId) {
        (**self).poll(session)
    }

    fn connect(&mut self, session: SessionId, tag: &DetectedTag) {
        (**self).connect(session, tag)
    }

    fn request_service(&mut self, session: SessionId, tag: &FelicaTag, service: ServiceCode) {
        (**self).request_service(session, tag, service)
    }

    fn read_without_encryption(
        &mut self,
        session: SessionId,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    ) {
        (**self).read_without_encryption(session, tag, service, blocks)
    }

    fn invalidate(&mut self, session: SessionId, reason: Option<&str>) {
        (**self).invalidate(session, reason)
    }
}
