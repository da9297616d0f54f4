// libsuica/src/lib.rs

//! libsuica
//!
//! Reads the remaining balance and last-use date from Suica / Kitaca
//! transit cards over FeliCa.
//!
//! The [`session`] module owns the scan state machine and its async
//! service; [`card::balance`] decodes the history record; [`transport`]
//! and [`protocol`] provide a frame-level reader backend.
#![warn(missing_docs)]

/// Tags, FeliCa card views and the balance decoder.
pub mod card;
pub mod constants;
/// Error types shared by every layer.
pub mod error;
/// Glob import of the commonly used types.
pub mod prelude;
pub mod protocol;
pub mod session;
pub mod test_support;
pub mod transport;
/// Newtypes for FeliCa identifiers, codes and blocks.
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
