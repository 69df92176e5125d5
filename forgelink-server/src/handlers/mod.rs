pub mod channel_ws;
pub mod channels;
pub mod history;
