// libsuica/src/utils/mod.rs

//! Small helpers shared by the protocol, session and logging code.

pub mod hex;
pub mod timeout;

pub use hex::*;
pub use timeout::*;
