//! Configuration structures for ForgeLink components.

pub mod server;
