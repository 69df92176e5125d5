//! Shared models and configuration for the ForgeLink platform.
//!
//! This crate holds the types that cross the wire between the ForgeLink
//! backend and its clients (channel, message, and error payloads) along with
//! the server configuration structure. It deliberately contains no I/O so it
//! can be depended on from any ForgeLink component.

pub mod config;
pub mod models;
