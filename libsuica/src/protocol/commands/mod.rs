// libsuica/src/protocol/commands/mod.rs

/// Polling (0x00).
pub mod polling;
/// Read Without Encryption (0x06).
pub mod read;
/// Request Service (0x02).
pub mod service;

pub use polling::encode_polling;
pub use read::encode_read;
pub use service::encode_request_service;

use crate::constants::{CMD_POLLING, CMD_READ_WITHOUT_ENCRYPTION, CMD_REQUEST_SERVICE};
use crate::types::{BlockReference, Idm, ServiceCode, SystemCode};

/// FeliCa commands issued during a scan. Per-command encoders live in
/// `protocol::commands::<name>.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look for a card of `system_code`.
    Polling {
        /// System to poll for, `SystemCode::ANY` for every card.
        system_code: SystemCode,
        /// 0x01 asks the card to append its system code.
        request_code: u8,
        /// Number of response slots minus one.
        time_slot: u8,
    },
    /// Ask for the key versions of `services`.
    RequestService {
        /// Addressed card.
        idm: Idm,
        /// Services to look up.
        services: Vec<ServiceCode>,
    },
    /// Read plain blocks from `services`.
    ReadWithoutEncryption {
        /// Addressed card.
        idm: Idm,
        /// Services the block list indexes into.
        services: Vec<ServiceCode>,
        /// Blocks to read.
        blocks: Vec<BlockReference>,
    },
}

impl Command {
    /// FeliCa command code byte.
    pub fn command_code(&self) -> u8 {
        match self {
            Self::Polling { .. } => CMD_POLLING,
            Self::RequestService { .. } => CMD_REQUEST_SERVICE,
            Self::ReadWithoutEncryption { .. } => CMD_READ_WITHOUT_ENCRYPTION,
        }
    }

    /// Encode into the raw payload (command code + params).
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Self::Polling {
                system_code,
                request_code,
                time_slot,
            } => encode_polling(*system_code, *request_code, *time_slot),
            Self::RequestService { idm, services } => encode_request_service(*idm, services),
            Self::ReadWithoutEncryption {
                idm,
                services,
                blocks,
            } => encode_read(*idm, services, blocks),
        }
    }
}
