// libsuica/src/protocol/responses/mod.rs

/// Polling response (0x01).
pub mod polling;
/// Read Without Encryption response (0x07).
pub mod read;
/// Request Service response (0x03).
pub mod service;

pub use polling::decode_polling;
pub use read::{ReadResponse, decode_read};
pub use service::decode_request_service;

use crate::constants::{CMD_POLLING, CMD_READ_WITHOUT_ENCRYPTION, CMD_REQUEST_SERVICE};
use crate::types::{Idm, KeyVersion, Pmm, SystemCode};

/// Decoded FeliCa responses. Per-command decoders live in
/// `protocol::responses::<name>.rs` and are dispatched here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A card answered Polling.
    Polling {
        /// Card identifier.
        idm: Idm,
        /// Card parameters.
        pmm: Pmm,
        /// Present when the poll asked for it.
        system_code: Option<SystemCode>,
    },
    /// Key versions in request order.
    RequestService {
        /// Responding card.
        idm: Idm,
        /// One per requested service; `KeyVersion::ABSENT` when missing.
        key_versions: Vec<KeyVersion>,
    },
    /// Status flags and, on success, the block data.
    ReadWithoutEncryption {
        /// Responding card.
        idm: Idm,
        /// Decoded read result.
        read: ReadResponse,
    },
}

impl Response {
    /// Decode a response payload (including response code) for the given
    /// command code.
    pub fn decode(command_code: u8, data: &[u8]) -> crate::Result<Self> {
        match command_code {
            CMD_POLLING => {
                let (idm, pmm, system_code) = decode_polling(data)?;
                Ok(Self::Polling {
                    idm,
                    pmm,
                    system_code,
                })
            }
            CMD_REQUEST_SERVICE => {
                let (idm, key_versions) = decode_request_service(data)?;
                Ok(Self::RequestService { idm, key_versions })
            }
            CMD_READ_WITHOUT_ENCRYPTION => {
                let (idm, read) = decode_read(data)?;
                Ok(Self::ReadWithoutEncryption { idm, read })
            }
            _ => Err(crate::Error::UnexpectedResponse {
                expected: command_code.wrapping_add(1),
                actual: data.first().copied().unwrap_or(0),
            }),
        }
    }

    /// IDm of the card that answered.
    pub fn idm(&self) -> &Idm {
        match self {
            Self::Polling { idm, .. }
            | Self::RequestService { idm, .. }
            | Self::ReadWithoutEncryption { idm, .. } => idm,
        }
    }
}
