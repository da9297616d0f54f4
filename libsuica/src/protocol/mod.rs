// libsuica/src/protocol/mod.rs

//! FeliCa command set spoken by the wire backend: Polling, RequestService
//! and ReadWithoutEncryption, carried in reader frames.

/// Command to frame and frame to response.
pub mod codec;
/// Command encoders.
pub mod commands;
/// Reader frame wrapping with length and data checksums.
pub mod frame;
pub mod parser;
/// Response decoders.
pub mod responses;

pub use commands::*;
pub use frame::{Frame, dcs, lcs};
pub use responses::*;
