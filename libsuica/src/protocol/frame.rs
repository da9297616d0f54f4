// libsuica/src/protocol/frame.rs

use crate::constants::{
    FELICA_MAX_PAYLOAD_LEN, FELICA_MIN_FRAME_LEN, FELICA_POSTAMBLE, FELICA_PREAMBLE,
};
use crate::{Error, Result};

/// Length checksum: LEN + LCS == 0 (mod 256)
pub fn lcs(len: u8) -> u8 {
    len.wrapping_neg()
}

/// Data checksum: sum(payload) + DCS == 0 (mod 256)
pub fn dcs(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b))
        .wrapping_neg()
}

/// Reader frame around a FeliCa command or response payload.
///
/// `[00 00 FF] [LEN] [LCS] [payload..] [DCS] [00]`
pub struct Frame;

impl Frame {
    /// Wrap `payload`; fails when it is longer than 255 bytes.
    pub fn encode(payload: &[u8]) -> Result<Vec<u8>> {
        let len = u8::try_from(payload.len()).map_err(|_| Error::InvalidLength {
            expected: FELICA_MAX_PAYLOAD_LEN,
            actual: payload.len(),
        })?;

        let mut out = Vec::with_capacity(FELICA_MIN_FRAME_LEN + payload.len());
        out.extend_from_slice(&FELICA_PREAMBLE);
        out.push(len);
        out.push(lcs(len));
        out.extend_from_slice(payload);
        out.push(dcs(payload));
        out.push(FELICA_POSTAMBLE);
        Ok(out)
    }

    /// Validate framing and checksums and return the payload.
    pub fn decode(frame: &[u8]) -> Result<Vec<u8>> {
        if frame.len() < FELICA_MIN_FRAME_LEN {
            return Err(Error::InvalidLength {
                expected: FELICA_MIN_FRAME_LEN,
                actual: frame.len(),
            });
        }

        if frame[..3] != FELICA_PREAMBLE {
            return Err(Error::FrameFormat("invalid preamble".into()));
        }

        let len = frame[3];
        let lcs_expected = lcs(len);
        if frame[4] != lcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: lcs_expected,
                actual: frame[4],
            });
        }

        let required_len = FELICA_MIN_FRAME_LEN + len as usize;
        if frame.len() != required_len {
            return Err(Error::InvalidLength {
                expected: required_len,
                actual: frame.len(),
            });
        }

        let payload = &frame[5..5 + len as usize];
        let dcs_actual = frame[5 + len as usize];
        let dcs_expected = dcs(payload);
        if dcs_actual != dcs_expected {
            return Err(Error::ChecksumMismatch {
                expected: dcs_expected,
                actual: dcs_actual,
            });
        }

        if frame[required_len - 1] != FELICA_POSTAMBLE {
            return Err(Error::FrameFormat("invalid postamble".into()));
        }

        Ok(payload.to_vec())
    }
}
