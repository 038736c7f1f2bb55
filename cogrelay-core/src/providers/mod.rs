//! Remote service descriptors
//!
//! One module per relay target. Each descriptor resolves its request URL
//! and headers from the configuration; the shared relay client does the
//! actual I/O.

pub mod adapter;
pub mod chat;
pub mod error;
pub mod face;
pub mod speech;

pub use adapter::RemoteService;
pub use chat::ChatCompletions;
pub use error::{RelayError, RelayResult};
pub use face::FaceDetection;
pub use speech::SpeechSynthesis;
