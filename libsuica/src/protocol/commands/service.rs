// libsuica/src/protocol/commands/service.rs

use crate::constants::CMD_REQUEST_SERVICE;
use crate::types::{Idm, ServiceCode};

/// Encode RequestService command (FeliCa command code 0x02)
/// Layout: command_code(1) + idm(8) + node_count(1) + node_code_list(2*N, little-endian)
pub fn encode_request_service(idm: Idm, services: &[ServiceCode]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10 + services.len() * 2);
    buf.push(CMD_REQUEST_SERVICE);
    buf.extend_from_slice(idm.as_bytes());
    buf.push(services.len() as u8);
    for svc in services {
        buf.extend_from_slice(&svc.to_le_bytes());
    }
    buf
}
