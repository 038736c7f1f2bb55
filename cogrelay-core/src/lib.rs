//! cogrelay core library
//!
//! Everything the gateway server needs short of the HTTP surface itself:
//! the environment-backed configuration snapshot, the chat protocol types
//! with their normalization rules, the remote service descriptors, and the
//! shared relay client.

pub mod config;
pub mod http;
pub mod protocol;
pub mod providers;

/// Returns the version of the cogrelay core library
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
