// libsuica/src/protocol/responses/polling.rs

use crate::constants::CMD_POLLING;
use crate::protocol::parser;
use crate::types::{Idm, Pmm, SystemCode};
use crate::Result;

/// Decode a Polling response payload (response code = 0x01)
/// Layout: response_code(1) + idm(8) + pmm(8) [+ system_code(2, big-endian)]
///
/// The system code is only present when the command asked for it.
pub fn decode_polling(data: &[u8]) -> Result<(Idm, Pmm, Option<SystemCode>)> {
    const MIN_LEN: usize = 1 + 8 + 8;
    parser::ensure_len(data, MIN_LEN)?;

    let idm = parser::expect_header(data, CMD_POLLING)?;
    let pmm = parser::pmm_at(data, 9)?;
    let system_code = match data.get(17..19) {
        Some(&[hi, lo]) => Some(SystemCode::from_be_bytes([hi, lo])),
        _ => None,
    };

    Ok((idm, pmm, system_code))
}
