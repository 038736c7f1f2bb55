//! Outbound HTTP layer
//!
//! A single pooled client relays every gateway path: JSON-in/JSON-out for
//! chat, opaque bytes for the proxy paths. Error mapping lives with the
//! relay error taxonomy in `providers::error`.

pub mod client;

pub use client::{RelayClient, RemoteReply};
