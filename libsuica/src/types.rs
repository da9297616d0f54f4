// libsuica/src/types.rs

use crate::Error;
use derive_more::Display;
use std::convert::TryFrom;

/// IDm - Newtype Pattern (8 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Idm([u8; 8]);

impl Idm {
    /// Wrap raw IDm bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    /// Lowercase hex, as shown in logs.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex(self.as_bytes())
    }
}

impl std::fmt::Display for Idm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<&[u8]> for Idm {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 8]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            })
    }
}

/// PMm - Newtype Pattern (8 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pmm([u8; 8]);

impl Pmm {
    /// Wrap raw PMm bytes.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Pmm {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 8]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLength {
                expected: 8,
                actual: bytes.len(),
            })
    }
}

/// SystemCode (u16). Sent big-endian in the Polling command.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "{:04X}", _0)]
pub struct SystemCode(u16);

impl SystemCode {
    /// Wildcard: every card answers.
    pub const ANY: Self = Self(0xffff);
    /// Japanese transit IC cards (Suica, Kitaca, ...).
    pub const SUICA: Self = Self(0x0003);

    /// Wrap a system code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Numeric value.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Wire order for Polling.
    pub fn to_be_bytes(&self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// Read from a Polling response.
    pub fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// ServiceCode (u16). Sent little-endian on the wire, so the Suica
/// balance/history service `0x090F` travels as `0F 09`.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "{:04X}", _0)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceCode(u16);

impl ServiceCode {
    /// Suica / Kitaca balance and usage history (random access, read-only).
    pub const SUICA_HISTORY: Self = Self(0x090f);

    /// Wrap a service code.
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Numeric value.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Wire order.
    pub fn to_le_bytes(&self) -> [u8; 2] {
        self.0.to_le_bytes()
    }
}

/// Key version returned by RequestService for one node.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "{:04X}", _0)]
pub struct KeyVersion(u16);

impl KeyVersion {
    /// Returned by the card when the requested node does not exist.
    pub const ABSENT: Self = Self(0xffff);

    /// Wrap a key version.
    pub const fn new(version: u16) -> Self {
        Self(version)
    }

    /// Read from a Request Service response.
    pub fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Numeric value.
    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// The node does not exist on the card.
    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}

/// Two-byte block list element: `[0x80 | service_list_index, block]`.
///
/// The high bit marks the two-byte form; access mode and service list
/// index are both zero because every read here targets a single service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockReference(u8);

impl BlockReference {
    /// Reference to block `index` of the service.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Block number.
    pub fn index(&self) -> u8 {
        self.0
    }

    /// Two-byte wire element.
    pub fn encode(&self) -> [u8; 2] {
        [crate::constants::BLOCK_LIST_TWO_BYTE_ELEMENT, self.0]
    }

    /// Block references `0..count`, in request order.
    pub fn batch(count: u8) -> Vec<Self> {
        (0..count).map(Self::new).collect()
    }
}

/// BlockData (16 バイト)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData([u8; 16]);

impl BlockData {
    /// Wrap one block.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Space-separated hex.
    pub fn to_hex(&self) -> String {
        crate::utils::bytes_to_hex_spaced(self.as_bytes())
    }
}

impl TryFrom<&[u8]> for BlockData {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; 16]>::try_from(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidLength {
                expected: 16,
                actual: bytes.len(),
            })
    }
}

/// RF technology the hardware session polls for.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PollingMode {
    /// NFC-A / NFC-B.
    #[display(fmt = "ISO 14443")]
    Iso14443,
    /// NFC-V.
    #[display(fmt = "ISO 15693")]
    Iso15693,
    /// NFC-F (FeliCa). Transit cards answer here.
    #[default]
    #[display(fmt = "ISO 18092")]
    Iso18092,
}
