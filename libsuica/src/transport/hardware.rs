// libsuica/src/transport/hardware.rs

use std::time::Duration;

use log::{debug, trace, warn};

use crate::card::{DetectedTag, FelicaTag, TagHandle};
use crate::constants::POLLING_REQUEST_SYSTEM_CODE;
use crate::error::HardwareError;
use crate::protocol::codec;
use crate::protocol::{Command, ReadResponse, Response};
use crate::session::{EventKind, EventSink, SessionId, TagHardware};
use crate::transport::Transport;
use crate::types::{BlockReference, Idm, KeyVersion, PollingMode, ServiceCode, SystemCode};
use crate::utils::{as_millis_u64, default_read_timeout};
use crate::{Error, Result};

/// [`TagHardware`] over a frame [`Transport`].
///
/// Commands run synchronously on the caller; their results are queued on
/// the [`EventSink`] before the call returns, so the session engine sees
/// them on its next turn like any other completion.
pub struct TransportHardware<T> {
    transport: T,
    events: EventSink,
    timeout_ms: u64,
    system_code: SystemCode,
    session: Option<SessionId>,
    next_handle: u32,
}

impl<T: Transport> TransportHardware<T> {
    /// Backend over `transport`, reporting to `events`. Polls for the
    /// Suica system with the default read timeout.
    pub fn new(transport: T, events: EventSink) -> Self {
        Self {
            transport,
            events,
            timeout_ms: as_millis_u64(default_read_timeout()),
            system_code: SystemCode::SUICA,
            session: None,
            next_handle: 1,
        }
    }

    /// Per-command response timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = as_millis_u64(timeout);
        self
    }

    /// System code sent with Polling. Defaults to the Suica system.
    pub fn with_system_code(mut self, system_code: SystemCode) -> Self {
        self.system_code = system_code;
        self
    }

    /// The underlying link.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send one command frame and decode the matching response.
    pub fn execute(&mut self, cmd: &Command) -> Result<Response> {
        let frame = codec::encode_command_frame(cmd)?;
        trace!("> {}", crate::utils::bytes_to_hex_spaced(&frame));
        self.transport.send(&frame)?;

        let raw = self.transport.receive(self.timeout_ms)?;
        trace!("< {}", crate::utils::bytes_to_hex_spaced(&raw));
        codec::decode_response_frame(cmd.command_code(), &raw)
    }

    /// Like [`Self::execute`], but the response must come from `idm`.
    fn execute_for(&mut self, idm: Idm, cmd: &Command) -> Result<Response> {
        let response = self.execute(cmd)?;
        if *response.idm() != idm {
            return Err(Error::FrameFormat(format!(
                "response from {} while addressing {}",
                response.idm(),
                idm
            )));
        }
        Ok(response)
    }

    fn polling(&mut self) -> Result<FelicaTag> {
        let cmd = Command::Polling {
            system_code: self.system_code,
            request_code: POLLING_REQUEST_SYSTEM_CODE,
            time_slot: 0,
        };
        match self.execute(&cmd)? {
            Response::Polling {
                idm,
                pmm,
                system_code,
            } => {
                let handle = TagHandle(self.next_handle);
                self.next_handle = self.next_handle.wrapping_add(1);
                Ok(FelicaTag::new(handle, idm, pmm, system_code))
            }
            other => Err(unexpected(&other)),
        }
    }

    fn request_service_blocking(
        &mut self,
        tag: &FelicaTag,
        service: ServiceCode,
    ) -> Result<Vec<KeyVersion>> {
        let cmd = Command::RequestService {
            idm: tag.idm,
            services: vec![service],
        };
        match self.execute_for(tag.idm, &cmd)? {
            Response::RequestService { key_versions, .. } => Ok(key_versions),
            other => Err(unexpected(&other)),
        }
    }

    fn read_blocking(
        &mut self,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    ) -> Result<ReadResponse> {
        let cmd = Command::ReadWithoutEncryption {
            idm: tag.idm,
            services: vec![service],
            blocks: blocks.to_vec(),
        };
        match self.execute_for(tag.idm, &cmd)? {
            Response::ReadWithoutEncryption { read, .. } => Ok(read),
            other => Err(unexpected(&other)),
        }
    }

    fn is_current(&self, session: SessionId) -> bool {
        if self.session == Some(session) {
            return true;
        }
        warn!("request for session {} which is not open", session);
        false
    }
}

fn unexpected(response: &Response) -> Error {
    Error::FrameFormat(format!("unexpected response {:?}", response))
}

impl<T: Transport> TagHardware for TransportHardware<T> {
    fn begin_session(
        &mut self,
        session: SessionId,
        mode: PollingMode,
        _alert_message: &str,
    ) -> std::result::Result<(), HardwareError> {
        if mode != PollingMode::Iso18092 {
            return Err(HardwareError::new(format!(
                "polling mode {} is not supported by a FeliCa reader",
                mode
            )));
        }
        self.transport.reset()?;
        self.session = Some(session);
        debug!("reader session {} open", session);
        Ok(())
    }

    fn poll(&mut self, session: SessionId) {
        if !self.is_current(session) {
            return;
        }
        match self.polling() {
            Ok(tag) => {
                debug!("polled {} ({})", tag.idm(), tag.handle);
                self.events
                    .deliver(session, EventKind::TagsDetected(vec![DetectedTag::felica(tag)]));
            }
            Err(Error::Timeout) => trace!("no card in field"),
            Err(err) => warn!("polling failed: {}", err),
        }
    }

    fn connect(&mut self, session: SessionId, tag: &DetectedTag) {
        if !self.is_current(session) {
            return;
        }
        // Polling already selected the card; there is no link to set up.
        let result = match tag.as_felica() {
            Some(_) => Ok(()),
            None => Err(HardwareError::new("only FeliCa tags are reachable")),
        };
        self.events.deliver(session, EventKind::Connected(result));
    }

    fn request_service(&mut self, session: SessionId, tag: &FelicaTag, service: ServiceCode) {
        if !self.is_current(session) {
            return;
        }
        let result = self
            .request_service_blocking(tag, service)
            .map_err(HardwareError::from);
        self.events
            .deliver(session, EventKind::ServiceResponded(result));
    }

    fn read_without_encryption(
        &mut self,
        session: SessionId,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    ) {
        if !self.is_current(session) {
            return;
        }
        let result = self
            .read_blocking(tag, service, blocks)
            .map_err(HardwareError::from);
        self.events.deliver(session, EventKind::ReadCompleted(result));
    }

    fn invalidate(&mut self, session: SessionId, reason: Option<&str>) {
        if self.session != Some(session) {
            return;
        }
        self.session = None;
        match reason {
            Some(reason) => debug!("reader session {} closed: {}", session, reason),
            None => debug!("reader session {} closed", session),
        }
        self.events.deliver(
            session,
            EventKind::Invalidated(reason.map(str::to_string)),
        );
    }
}
