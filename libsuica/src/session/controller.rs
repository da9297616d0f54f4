// libsuica/src/session/controller.rs

use log::{debug, info, warn};

use crate::card::{DetectedTag, FelicaTag, SuicaRecord, balance};
use crate::error::HardwareError;
use crate::protocol::ReadResponse;
use crate::session::{EventKind, ScanConfig, ScanState, SessionEvent, SessionId, TagHardware};
use crate::types::{BlockData, BlockReference, KeyVersion};
use crate::{Error, Result};

/// One-shot receiver of a successful scan.
pub type ResultCallback = Box<dyn FnOnce(SuicaRecord) + Send + 'static>;

/// How a scan attempt ended.
pub type ScanOutcome = Result<SuicaRecord>;

/// Effect of feeding one input to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed: stale, duplicate or out-of-order input.
    Ignored,
    /// The attempt moved on and is now in this state.
    Advanced(ScanState),
    /// The attempt ended; the hardware session has been released.
    Terminated(ScanOutcome),
}

struct ActiveScan {
    id: SessionId,
    state: ScanState,
    detected: Option<DetectedTag>,
    felica: Option<FelicaTag>,
    on_result: ResultCallback,
}

/// Drives a single scan attempt against a [`TagHardware`].
///
/// All session state lives in one `Option` that is taken when the attempt
/// ends, before the hardware is told to invalidate and before the callback
/// runs. Any completion arriving afterwards finds no matching session and is
/// dropped.
pub struct SessionController<H> {
    hardware: H,
    config: ScanConfig,
    active: Option<ActiveScan>,
    last_id: u64,
}

impl<H: TagHardware> SessionController<H> {
    /// Idle controller over `hardware`.
    pub fn new(hardware: H, config: ScanConfig) -> Self {
        Self {
            hardware,
            config,
            active: None,
            last_id: 0,
        }
    }

    /// Settings used for every attempt.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The injected hardware.
    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    /// State of the running attempt, [`ScanState::Idle`] when there is
    /// none. Never [`ScanState::Terminated`].
    ///
    /// ```
    /// use libsuica::session::{ScanConfig, ScanState, SessionController, Transition};
    /// use libsuica::test_support::RecordingHardware;
    ///
    /// let mut ctl = SessionController::new(RecordingHardware::new(), ScanConfig::default());
    /// ctl.start_scan(|_| {}).unwrap();
    /// assert_eq!(ctl.state(), ScanState::Scanning);
    ///
    /// assert!(matches!(ctl.stop_scan(), Transition::Terminated(_)));
    /// assert_eq!(ctl.state(), ScanState::Idle);
    /// ```
    pub fn state(&self) -> ScanState {
        self.active
            .as_ref()
            .map_or(ScanState::Idle, |scan| scan.state)
    }

    /// Id of the running attempt.
    pub fn active_session(&self) -> Option<SessionId> {
        self.active.as_ref().map(|scan| scan.id)
    }

    /// Open a reader session and remember `on_result` for the outcome.
    ///
    /// Fails with [`Error::SessionAlreadyActive`] while another attempt is
    /// running; that attempt is left untouched.
    pub fn start_scan<F>(&mut self, on_result: F) -> Result<SessionId>
    where
        F: FnOnce(SuicaRecord) + Send + 'static,
    {
        if let Some(scan) = &self.active {
            warn!("start_scan refused: session {} is {}", scan.id, scan.state);
            return Err(Error::SessionAlreadyActive);
        }

        let id = SessionId::new(self.last_id + 1);
        self.hardware
            .begin_session(id, self.config.polling_mode, &self.config.alert_message)
            .map_err(Error::ReaderUnavailable)?;
        self.last_id = id.as_u64();

        self.active = Some(ActiveScan {
            id,
            state: ScanState::Scanning,
            detected: None,
            felica: None,
            on_result: Box::new(on_result),
        });
        debug!("session {} scanning ({})", id, self.config.polling_mode);
        Ok(id)
    }

    /// Cancel the active attempt, whatever its state.
    pub fn stop_scan(&mut self) -> Transition {
        self.fail(Error::Cancelled)
    }

    /// Ask the reader to look for tags if the attempt is still scanning.
    pub fn poll(&mut self) {
        match &self.active {
            Some(scan) if scan.state == ScanState::Scanning => self.hardware.poll(scan.id),
            _ => {}
        }
    }

    /// End an attempt whose outstanding command took too long.
    pub fn expire(&mut self) -> Transition {
        let awaiting = self
            .active
            .as_ref()
            .is_some_and(|scan| scan.state.is_awaiting_completion());
        if !awaiting {
            return Transition::Ignored;
        }
        self.fail(Error::Timeout)
    }

    /// Apply one hardware notification.
    pub fn handle(&mut self, event: SessionEvent) -> Transition {
        let state = match &self.active {
            Some(scan) if scan.id == event.session => scan.state,
            Some(scan) => {
                debug!(
                    "discarding {} for session {} (active: {})",
                    event.kind.name(),
                    event.session,
                    scan.id
                );
                return Transition::Ignored;
            }
            None => {
                debug!(
                    "discarding {} for session {}: no active session",
                    event.kind.name(),
                    event.session
                );
                return Transition::Ignored;
            }
        };

        match (state, event.kind) {
            (_, EventKind::Invalidated(reason)) => self.abandon(reason),
            (ScanState::Scanning, EventKind::TagsDetected(tags)) => self.on_tags_detected(tags),
            (ScanState::Connecting, EventKind::Connected(result)) => self.on_connected(result),
            (ScanState::ServiceRequesting, EventKind::ServiceResponded(result)) => {
                self.on_service_responded(result)
            }
            (ScanState::BlockReading, EventKind::ReadCompleted(result)) => {
                self.on_read_completed(result)
            }
            (state, kind) => {
                warn!(
                    "session {}: ignoring {} while {}",
                    event.session,
                    kind.name(),
                    state
                );
                Transition::Ignored
            }
        }
    }

    fn on_tags_detected(&mut self, tags: Vec<DetectedTag>) -> Transition {
        let count = tags.len();
        let Some(first) = tags.into_iter().next() else {
            debug!("empty tag list, still scanning");
            return Transition::Ignored;
        };
        let Some(scan) = self.active.as_mut() else {
            return Transition::Ignored;
        };
        if count > 1 {
            debug!("session {}: {} tags detected, using the first", scan.id, count);
        }

        scan.state = ScanState::Connecting;
        self.hardware.connect(scan.id, &first);
        scan.detected = Some(first);
        Transition::Advanced(ScanState::Connecting)
    }

    fn on_connected(&mut self, result: std::result::Result<(), HardwareError>) -> Transition {
        if let Err(err) = result {
            return self.fail(Error::TagConnectionFailed(err));
        }
        let Some(scan) = self.active.as_mut() else {
            return Transition::Ignored;
        };
        let Some(tag) = scan.detected.as_ref().and_then(DetectedTag::as_felica).copied() else {
            return self.fail(Error::IncompatibleTag);
        };

        debug!("session {}: connected to {}", scan.id, tag.idm());
        scan.felica = Some(tag);
        scan.state = ScanState::ServiceRequesting;
        self.hardware
            .request_service(scan.id, &tag, self.config.service_code);
        Transition::Advanced(ScanState::ServiceRequesting)
    }

    fn on_service_responded(
        &mut self,
        result: std::result::Result<Vec<KeyVersion>, HardwareError>,
    ) -> Transition {
        let key_versions = match result {
            Ok(versions) => versions,
            Err(err) => return self.fail(Error::ServiceConnectionFailed(err)),
        };
        let service = self.config.service_code;
        match key_versions.first() {
            Some(version) if !version.is_absent() => {
                debug!("service {} key version {}", service, version)
            }
            _ => return self.fail(Error::ServiceNotPresent(service)),
        }

        let Some(scan) = self.active.as_mut() else {
            return Transition::Ignored;
        };
        let Some(tag) = scan.felica else {
            return self.fail(Error::IncompatibleTag);
        };

        // Full history batch in one read; only block 0 is decoded.
        let blocks = BlockReference::batch(self.config.history_blocks);
        scan.state = ScanState::BlockReading;
        self.hardware
            .read_without_encryption(scan.id, &tag, service, &blocks);
        Transition::Advanced(ScanState::BlockReading)
    }

    fn on_read_completed(
        &mut self,
        result: std::result::Result<ReadResponse, HardwareError>,
    ) -> Transition {
        let read = match result {
            Ok(read) => read,
            Err(err) => return self.fail(Error::ReadFailed(err)),
        };
        if !read.is_success() {
            return self.fail(Error::StatusFlagsAbnormal {
                status1: read.status1,
                status2: read.status2,
            });
        }
        if read.blocks.len() != usize::from(self.config.history_blocks) {
            debug!(
                "read returned {} of {} blocks",
                read.blocks.len(),
                self.config.history_blocks
            );
        }
        match read.blocks.first() {
            Some(block) => self.complete(*block),
            None => self.fail(Error::ReadFailed(HardwareError::new(
                "read returned no block data",
            ))),
        }
    }

    fn complete(&mut self, block: BlockData) -> Transition {
        let Some(scan) = self.active.take() else {
            return Transition::Ignored;
        };
        self.hardware.invalidate(scan.id, None);

        let record = balance::decode(&block);
        info!("session {} read {}", scan.id, record);
        (scan.on_result)(record);
        Transition::Terminated(Ok(record))
    }

    /// End the attempt with `error`, telling the hardware why.
    fn fail(&mut self, error: Error) -> Transition {
        let Some(scan) = self.active.take() else {
            return Transition::Ignored;
        };
        let reason = error.invalidation_reason();
        match reason {
            Some(reason) => warn!(
                "session {} failed while {}: {} ({})",
                scan.id, scan.state, error, reason
            ),
            None => debug!("session {} ended while {}: {}", scan.id, scan.state, error),
        }
        self.hardware.invalidate(scan.id, reason);
        Transition::Terminated(Err(error))
    }

    /// The hardware ended the session on its own; nothing left to release.
    fn abandon(&mut self, reason: Option<String>) -> Transition {
        let Some(scan) = self.active.take() else {
            return Transition::Ignored;
        };
        debug!(
            "session {} invalidated by reader while {}",
            scan.id, scan.state
        );
        Transition::Terminated(Err(Error::SessionInvalidated(reason)))
    }
}

impl<H> std::fmt::Debug for SessionController<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &self.active.as_ref().map(|scan| scan.id))
            .field("state", &self.active.as_ref().map(|scan| scan.state))
            .field("config", &self.config)
            .finish()
    }
}
