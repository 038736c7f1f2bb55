//! Wire types for the chat relay
//!
//! Inbound payloads are normalized here, at the parsing boundary: both
//! accepted spellings of the conversation key map onto one representation,
//! and [`ChatPayload::conversation`] enforces the system-prompt invariant
//! before anything is forwarded. The outbound types mirror the remote
//! chat-completion wire format.

use serde::{Deserialize, Serialize};

/// Role of a message in the conversation
///
/// Closed set; any other role in an inbound payload is a deserialization
/// error and surfaces as a client input error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Server-controlled instruction that steers model behavior
    System,
    /// Caller input
    User,
    /// Model response
    Assistant,
}

/// A single turn in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Inbound request body for the chat endpoint
///
/// The conversation is accepted under either `messages` or `chatHistory`
/// (older callers use the latter).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatPayload {
    #[serde(default, alias = "chatHistory")]
    pub messages: Vec<ChatMessage>,

    /// Per-request sampling override
    pub temperature: Option<f32>,

    /// Per-request output-length override
    pub max_tokens: Option<u32>,
}

impl ChatPayload {
    /// True when the caller supplied no usable conversation
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Build the outbound message sequence.
    ///
    /// The server-configured system prompt, when present, occupies position
    /// zero; caller-supplied `system` messages are dropped either way. The
    /// caller never controls the system instruction.
    pub fn conversation(&self, system_prompt: Option<&str>) -> Vec<ChatMessage> {
        let mut out = Vec::with_capacity(self.messages.len() + 1);
        if let Some(prompt) = system_prompt {
            out.push(ChatMessage::system(prompt));
        }
        out.extend(
            self.messages
                .iter()
                .filter(|m| m.role != Role::System)
                .cloned(),
        );
        out
    }
}

/// Outbound chat-completion request body
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Always false: incremental delivery is disabled on the relay path
    pub stream: bool,
}

/// Remote chat-completion response, reduced to what the relay consumes
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Content of the first completion, if the remote produced one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}
