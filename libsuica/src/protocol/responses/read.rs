// libsuica/src/protocol/responses/read.rs

use crate::constants::{BLOCK_SIZE, CMD_READ_WITHOUT_ENCRYPTION};
use crate::protocol::parser;
use crate::types::{BlockData, Idm};
use crate::Result;

/// Result of a ReadWithoutEncryption command as seen by the session.
///
/// The status flags are reported as-is; judging them is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResponse {
    /// Status flag 1; non-zero on failure.
    pub status1: u8,
    /// Status flag 2; the error detail.
    pub status2: u8,
    /// One block per requested reference, in request order.
    pub blocks: Vec<BlockData>,
}

impl ReadResponse {
    /// Build from flags and blocks.
    pub fn new(status1: u8, status2: u8, blocks: Vec<BlockData>) -> Self {
        Self {
            status1,
            status2,
            blocks,
        }
    }

    /// Both status flags are zero.
    pub fn is_success(&self) -> bool {
        self.status1 == 0 && self.status2 == 0
    }
}

/// Decode ReadWithoutEncryption response payload (response code = 0x07)
/// Layout: response_code(1) + idm(8) + status1(1) + status2(1)
///         [+ block_count(1) + blocks(N*16)]
///
/// The card omits the block count and data when a status flag is set.
pub fn decode_read(data: &[u8]) -> Result<(Idm, ReadResponse)> {
    const MIN_LEN: usize = 1 + 8 + 1 + 1;
    parser::ensure_len(data, MIN_LEN)?;

    let idm = parser::expect_header(data, CMD_READ_WITHOUT_ENCRYPTION)?;
    let status1 = parser::byte_at(data, 9)?;
    let status2 = parser::byte_at(data, 10)?;

    if status1 != 0 || status2 != 0 {
        return Ok((idm, ReadResponse::new(status1, status2, Vec::new())));
    }

    let block_count = parser::byte_at(data, 11)? as usize;
    parser::ensure_len(data, 12 + block_count * BLOCK_SIZE)?;

    let blocks = (0..block_count)
        .map(|i| parser::block_at(data, 12 + i * BLOCK_SIZE))
        .collect::<Result<Vec<_>>>()?;

    Ok((idm, ReadResponse::new(status1, status2, blocks)))
}
