// libsuica/src/test_support.rs

//! Test doubles for the session engine, shared by unit tests and the
//! tests/ directory.
//!
//! [`RecordingHardware`] only records what the engine asks for; tests feed
//! completions by hand. [`CardSimulator`] answers like a reader with one
//! Suica card in the field, through an [`EventSink`].
#![allow(dead_code)]

use std::sync::{Arc, Mutex, PoisonError};

use crate::card::{DetectedTag, FelicaTag, TagHandle};
use crate::error::HardwareError;
use crate::protocol::ReadResponse;
use crate::session::{EventKind, EventSink, SessionId, TagHardware};
use crate::types::{
    BlockData, BlockReference, Idm, KeyVersion, PollingMode, Pmm, ServiceCode, SystemCode,
};

/// Newest history record of the sample card: 2022年1月21日, 1000円.
pub const SAMPLE_HISTORY_BLOCK: [u8; 16] = [
    0x16, 0x01, 0x00, 0x02, 0x2C, 0x35, 0xE1, 0x0A, 0xE3, 0x13, 0xE8, 0x03, 0x00, 0x00, 0x0B, 0x00,
];

/// IDm of the sample card.
pub const SAMPLE_IDM: [u8; 8] = [0x01, 0x01, 0x02, 0x12, 0x9A, 0x0B, 0x5C, 0x2E];
/// PMm of the sample card.
pub const SAMPLE_PMM: [u8; 8] = [0x10, 0x0B, 0x4B, 0x42, 0x84, 0x85, 0xD0, 0xFF];

/// The sample card as seen by a poll, under `handle`.
#[doc(hidden)]
pub fn suica_tag(handle: u32) -> FelicaTag {
    FelicaTag::new(
        TagHandle(handle),
        Idm::from_bytes(SAMPLE_IDM),
        Pmm::from_bytes(SAMPLE_PMM),
        Some(SystemCode::SUICA),
    )
}

/// [`SAMPLE_HISTORY_BLOCK`] as block data.
#[doc(hidden)]
pub fn history_block() -> BlockData {
    BlockData::from_bytes(SAMPLE_HISTORY_BLOCK)
}

/// Successful 12-block read whose first block is [`history_block`].
#[doc(hidden)]
pub fn history_read() -> ReadResponse {
    let mut blocks = vec![history_block()];
    blocks.extend((1..12u8).map(|i| BlockData::from_bytes([i; 16])));
    ReadResponse::new(0, 0, blocks)
}

/// One request the engine made of the hardware.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum HardwareCall {
    /// `begin_session`.
    Begin {
        session: SessionId,
        mode: PollingMode,
        alert_message: String,
    },
    /// `poll`.
    Poll { session: SessionId },
    /// `connect`.
    Connect { session: SessionId, tag: TagHandle },
    /// `request_service`.
    RequestService {
        session: SessionId,
        tag: TagHandle,
        service: ServiceCode,
    },
    /// `read_without_encryption`.
    Read {
        session: SessionId,
        tag: TagHandle,
        service: ServiceCode,
        blocks: Vec<BlockReference>,
    },
    /// `invalidate`.
    Invalidate {
        session: SessionId,
        reason: Option<String>,
    },
}

/// Hardware that records calls and never completes anything on its own.
///
/// Clones share the same log, so a test can keep one clone while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct RecordingHardware {
    calls: Arc<Mutex<Vec<HardwareCall>>>,
    refuse_begin: bool,
}

impl RecordingHardware {
    /// Hardware that accepts every session.
    pub fn new() -> Self {
        Self::default()
    }

    /// A reader whose `begin_session` always fails.
    pub fn refusing() -> Self {
        Self {
            refuse_begin: true,
            ..Self::default()
        }
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<HardwareCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent call.
    pub fn last_call(&self) -> Option<HardwareCall> {
        self.calls().pop()
    }

    /// Sessions invalidated so far, with their reasons.
    pub fn invalidations(&self) -> Vec<(SessionId, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HardwareCall::Invalidate { session, reason } => Some((session, reason)),
                _ => None,
            })
            .collect()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&HardwareCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: HardwareCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl TagHardware for RecordingHardware {
    fn begin_session(
        &mut self,
        session: SessionId,
        mode: PollingMode,
        alert_message: &str,
    ) -> Result<(), HardwareError> {
        if self.refuse_begin {
            return Err(HardwareError::new("NFC not available"));
        }
        self.record(HardwareCall::Begin {
            session,
            mode,
            alert_message: alert_message.to_string(),
        });
        Ok(())
    }

    fn poll(&mut self, session: SessionId) {
        self.record(HardwareCall::Poll { session });
    }

    fn connect(&mut self, session: SessionId, tag: &DetectedTag) {
        self.record(HardwareCall::Connect {
            session,
            tag: tag.handle,
        });
    }

    fn request_service(&mut self, session: SessionId, tag: &FelicaTag, service: ServiceCode) {
        self.record(HardwareCall::RequestService {
            session,
            tag: tag.handle,
            service,
        });
    }

    fn read_without_encryption(
        &mut self,
        session: SessionId,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    ) {
        self.record(HardwareCall::Read {
            session,
            tag: tag.handle,
            service,
            blocks: blocks.to_vec(),
        });
    }

    fn invalidate(&mut self, session: SessionId, reason: Option<&str>) {
        self.record(HardwareCall::Invalidate {
            session,
            reason: reason.map(str::to_string),
        });
    }
}

/// Reader with a scripted card in the field.
///
/// The card shows up on the first poll of each session. Every request is
/// answered immediately through the sink, unless the stage was made
/// unresponsive.
#[derive(Debug, Clone)]
pub struct CardSimulator {
    events: EventSink,
    recorder: RecordingHardware,
    card: Option<DetectedTag>,
    detected_in: Option<SessionId>,
    connect: Result<(), HardwareError>,
    service: Result<Vec<KeyVersion>, HardwareError>,
    read: Result<ReadResponse, HardwareError>,
    read_responds: bool,
}

impl CardSimulator {
    /// A Suica card holding [`history_read`].
    pub fn new(events: EventSink) -> Self {
        Self {
            events,
            recorder: RecordingHardware::new(),
            card: Some(DetectedTag::felica(suica_tag(1))),
            detected_in: None,
            connect: Ok(()),
            service: Ok(vec![KeyVersion::new(0x0100)]),
            read: Ok(history_read()),
            read_responds: true,
        }
    }

    /// Card shown on poll; `None` leaves the field empty.
    pub fn with_card(mut self, card: Option<DetectedTag>) -> Self {
        self.card = card;
        self
    }

    /// Outcome of every connect.
    pub fn with_connect(mut self, result: Result<(), HardwareError>) -> Self {
        self.connect = result;
        self
    }

    /// Key versions returned by Request Service.
    pub fn with_key_versions(mut self, versions: Vec<KeyVersion>) -> Self {
        self.service = Ok(versions);
        self
    }

    /// Outcome of every block read.
    pub fn with_read(mut self, result: Result<ReadResponse, HardwareError>) -> Self {
        self.read = result;
        self
    }

    /// Never complete the block read.
    pub fn unresponsive_read(mut self) -> Self {
        self.read_responds = false;
        self
    }

    /// Shared view of the calls this simulator received.
    pub fn recorder(&self) -> RecordingHardware {
        self.recorder.clone()
    }
}

impl TagHardware for CardSimulator {
    fn begin_session(
        &mut self,
        session: SessionId,
        mode: PollingMode,
        alert_message: &str,
    ) -> Result<(), HardwareError> {
        self.recorder.begin_session(session, mode, alert_message)
    }

    fn poll(&mut self, session: SessionId) {
        self.recorder.poll(session);
        if self.detected_in == Some(session) {
            return;
        }
        if let Some(card) = &self.card {
            self.detected_in = Some(session);
            self.events
                .deliver(session, EventKind::TagsDetected(vec![card.clone()]));
        }
    }

    fn connect(&mut self, session: SessionId, tag: &DetectedTag) {
        self.recorder.connect(session, tag);
        self.events
            .deliver(session, EventKind::Connected(self.connect.clone()));
    }

    fn request_service(&mut self, session: SessionId, tag: &FelicaTag, service: ServiceCode) {
        self.recorder.request_service(session, tag, service);
        self.events
            .deliver(session, EventKind::ServiceResponded(self.service.clone()));
    }

    fn read_without_encryption(
        &mut self,
        session: SessionId,
        tag: &FelicaTag,
        service: ServiceCode,
        blocks: &[BlockReference],
    ) {
        self.recorder
            .read_without_encryption(session, tag, service, blocks);
        if self.read_responds {
            self.events
                .deliver(session, EventKind::ReadCompleted(self.read.clone()));
        }
    }

    fn invalidate(&mut self, session: SessionId, reason: Option<&str>) {
        self.recorder.invalidate(session, reason);
        self.events.deliver(
            session,
            EventKind::Invalidated(reason.map(str::to_string)),
        );
    }
}
