//! Two-player network sync
//!
//! - `message`: JSON wire format and validation
//! - `channel`: transport capability and an in-process loopback
//! - `session`: per-role apply and broadcast

pub mod channel;
pub mod message;
pub mod session;

pub use channel::{Channel, ChannelEvent, LoopbackChannel};
pub use message::{NetError, NetMessage};
pub use session::{NetSession, apply_message, snapshot};
