// libsuica/src/prelude.rs

pub use crate::card::{DetectedTag, FelicaTag, SuicaRecord, TagHandle, TagKind, UseDate};
pub use crate::protocol::{Command, ReadResponse, Response};
pub use crate::session::{
    EventKind, EventSink, ScanConfig, ScanHandle, ScanOutcome, ScanService, ScanState,
    SessionController, SessionEvent, SessionId, TagHardware, Transition,
};
pub use crate::transport::{MockTransport, Transport, TransportHardware};
pub use crate::{
    BlockData, BlockReference, Error, HardwareError, Idm, KeyVersion, PollingMode, Pmm, Result,
    ServiceCode, SystemCode,
};

// Re-export small utilities for convenience
pub use crate::utils::{bytes_to_hex, bytes_to_hex_spaced, default_read_timeout, ms};
