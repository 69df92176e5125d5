pub mod channel_registry;
pub mod chat_service;
