// libsuica/src/protocol/commands/read.rs

use crate::constants::CMD_READ_WITHOUT_ENCRYPTION;
use crate::types::{BlockReference, Idm, ServiceCode};

/// Encode ReadWithoutEncryption command payload (FeliCa command code 0x06)
/// Layout: command_code(1) + idm(8) + service_count(1) + services(2*N)
///         + block_count(1) + block_list(2*M)
pub fn encode_read(idm: Idm, services: &[ServiceCode], blocks: &[BlockReference]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(11 + services.len() * 2 + blocks.len() * 2);
    buf.push(CMD_READ_WITHOUT_ENCRYPTION);
    buf.extend_from_slice(idm.as_bytes());

    buf.push(services.len() as u8);
    for svc in services {
        buf.extend_from_slice(&svc.to_le_bytes());
    }

    buf.push(blocks.len() as u8);
    for blk in blocks {
        buf.extend_from_slice(&blk.encode());
    }

    buf
}
