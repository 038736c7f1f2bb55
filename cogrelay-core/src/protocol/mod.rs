//! Protocol types for the relay paths

pub mod types;

pub use types::{
    ChatMessage, ChatPayload, CompletionChoice, CompletionMessage, CompletionRequest,
    CompletionResponse, Role,
};
