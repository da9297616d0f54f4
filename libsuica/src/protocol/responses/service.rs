// libsuica/src/protocol/responses/service.rs

use crate::constants::CMD_REQUEST_SERVICE;
use crate::protocol::parser;
use crate::types::{Idm, KeyVersion};
use crate::Result;

/// Decode RequestService response payload (response code = 0x03)
/// Layout: response_code(1) + idm(8) + count(1) + key_versions(N*2, little-endian)
pub fn decode_request_service(data: &[u8]) -> Result<(Idm, Vec<KeyVersion>)> {
    const MIN_LEN: usize = 1 + 8 + 1;
    parser::ensure_len(data, MIN_LEN)?;

    let idm = parser::expect_header(data, CMD_REQUEST_SERVICE)?;
    let count = parser::byte_at(data, 9)? as usize;
    parser::ensure_len(data, MIN_LEN + count * 2)?;

    let key_versions = (0..count)
        .map(|i| parser::key_version_at(data, MIN_LEN + i * 2))
        .collect::<Result<Vec<_>>>()?;

    Ok((idm, key_versions))
}
