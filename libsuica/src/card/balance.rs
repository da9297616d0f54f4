// libsuica/src/card/balance.rs

//! Decoding of a Suica usage-history block.
//!
//! Block layout (only the fields used here):
//!
//! | byte    | content                                     |
//! |---------|---------------------------------------------|
//! | 4..=5   | date: `yyyyyyym mmmddddd` (year since 2000) |
//! | 10..=11 | remaining balance in yen, little-endian     |
//!
//! The other bytes carry the terminal type, process type and stations of
//! the transaction and are not read.

use chrono::NaiveDate;
use derive_more::Display;

use crate::types::BlockData;

/// Date packed into a history block.
///
/// Kept as the raw triple: blank or damaged records carry month/day 0,
/// which is not a calendar date. Use [`UseDate::to_naive_date`] when a
/// real date is needed.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display(fmt = "{}年{}月{}日", year, month, day)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseDate {
    /// Full year, 2000 to 2127.
    pub year: u16,
    /// 1 to 12 on a valid record.
    pub month: u8,
    /// 1 to 31 on a valid record.
    pub day: u8,
}

impl UseDate {
    /// Calendar date, `None` for blank or impossible records.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year.into(), self.month.into(), self.day.into())
    }
}

/// Balance and last-use date read from the newest history record.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[display(fmt = "{} {}円", last_use_date, remaining_balance)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuicaRecord {
    /// Remaining stored value in yen.
    pub remaining_balance: u32,
    /// Date of the newest transaction.
    pub last_use_date: UseDate,
}

/// Decode the newest history block into a [`SuicaRecord`].
///
/// Precondition: `block` comes from a read whose status flags were both
/// zero. The decoder does not validate the record contents.
pub fn decode(block: &BlockData) -> SuicaRecord {
    let b = block.as_bytes();

    let year = u16::from(b[4] >> 1) + 2000;
    // The 4-bit month straddles bytes 4 and 5.
    let month = (if b[4] & 1 == 1 { 8 } else { 0 }) + (b[5] >> 5);
    let day = b[5] & 0x1f;

    let remaining_balance = u32::from(b[10]) + (u32::from(b[11]) << 8);

    SuicaRecord {
        remaining_balance,
        last_use_date: UseDate { year, month, day },
    }
}
