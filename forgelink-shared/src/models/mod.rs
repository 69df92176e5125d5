//! Wire-level data models shared between the ForgeLink backend and clients.

pub mod channel;
pub mod errors;
pub mod message;
pub mod timestamp;

pub use channel::Channel;
pub use errors::ErrorResponse;
pub use message::{ChannelMessage, InboundFrame};
pub use timestamp::Timestamp;
