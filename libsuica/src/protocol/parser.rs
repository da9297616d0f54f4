// libsuica/src/protocol/parser.rs

//! Bounds-checked readers for response payloads.

use crate::types::{BlockData, Idm, KeyVersion, Pmm};
use crate::{Error, Result};

/// Ensure the slice has at least `min` bytes.
pub fn ensure_len(data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(Error::InvalidLength {
            expected: min,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Return a subslice with bounds checking.
pub fn slice_at(data: &[u8], idx: usize, len: usize) -> Result<&[u8]> {
    let end = idx.checked_add(len).ok_or(Error::InvalidLength {
        expected: usize::MAX,
        actual: data.len(),
    })?;
    ensure_len(data, end)?;
    Ok(&data[idx..end])
}

/// Single byte at `idx`.
pub fn byte_at(data: &[u8], idx: usize) -> Result<u8> {
    Ok(slice_at(data, idx, 1)?[0])
}

/// IDm starting at `start`.
pub fn idm_at(data: &[u8], start: usize) -> Result<Idm> {
    Idm::try_from(slice_at(data, start, 8)?)
}

/// PMm starting at `start`.
pub fn pmm_at(data: &[u8], start: usize) -> Result<Pmm> {
    Pmm::try_from(slice_at(data, start, 8)?)
}

/// Key versions are little-endian, like service codes.
pub fn key_version_at(data: &[u8], idx: usize) -> Result<KeyVersion> {
    let s = slice_at(data, idx, 2)?;
    Ok(KeyVersion::from_le_bytes([s[0], s[1]]))
}

/// 16-byte block starting at `idx`.
pub fn block_at(data: &[u8], idx: usize) -> Result<BlockData> {
    BlockData::try_from(slice_at(data, idx, crate::constants::BLOCK_SIZE)?)
}

/// Check the response code and the IDm echo that every FeliCa response
/// starts with.
pub fn expect_header(data: &[u8], command_code: u8) -> Result<Idm> {
    let expected = command_code.wrapping_add(1);
    let actual = byte_at(data, 0)?;
    if actual != expected {
        return Err(Error::UnexpectedResponse { expected, actual });
    }
    idm_at(data, 1)
}
