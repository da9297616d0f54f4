// libsuica/src/transport/mod.rs

//! Byte-level reader link and the [`TagHardware`](crate::session::TagHardware)
//! backend that speaks FeliCa frames over it.

/// [`TransportHardware`], the frame-speaking hardware backend.
pub mod hardware;
/// In-memory transport for tests.
pub mod mock;
/// The [`Transport`] trait.
pub mod traits;

pub use hardware::TransportHardware;
pub use mock::MockTransport;
pub use traits::Transport;
