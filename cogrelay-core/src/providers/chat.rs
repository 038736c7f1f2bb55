//! Chat-completion relay target
//!
//! Resolves the deployment-scoped completion URL and owns the outbound
//! payload construction: forced system prompt, caller overrides, streaming
//! disabled.

use crate::config::{vars, ChatSettings, ConfigError, ConfigResult, SecretString};
use crate::protocol::{ChatPayload, CompletionRequest};
use crate::providers::adapter::RemoteService;
use std::collections::HashMap;
use url::Url;

/// Remote chat-completion deployment
#[derive(Debug)]
pub struct ChatCompletions {
    url: Url,
    api_key: SecretString,
    system_prompt: Option<String>,
    default_temperature: f32,
    default_max_tokens: u32,
}

impl ChatCompletions {
    /// Build the relay target from resolved settings.
    ///
    /// The request URL is
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={v}`;
    /// the deployment name is percent-encoded as a path segment.
    pub fn new(settings: ChatSettings<'_>) -> ConfigResult<Self> {
        let mut url = Url::parse(settings.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            name: vars::CHAT_ENDPOINT.to_string(),
            message: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidEndpoint {
                name: vars::CHAT_ENDPOINT.to_string(),
                message: "endpoint cannot be a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend([
                "openai",
                "deployments",
                settings.deployment,
                "chat",
                "completions",
            ]);
        url.query_pairs_mut()
            .append_pair("api-version", settings.api_version);

        Ok(Self {
            url,
            api_key: settings.api_key.clone(),
            system_prompt: settings.system_prompt.map(str::to_string),
            default_temperature: settings.default_temperature,
            default_max_tokens: settings.default_max_tokens,
        })
    }

    /// Build the outbound completion request for one inbound payload
    pub fn build_request(&self, payload: &ChatPayload) -> CompletionRequest {
        CompletionRequest {
            messages: payload.conversation(self.system_prompt.as_deref()),
            temperature: payload.temperature.unwrap_or(self.default_temperature),
            max_tokens: payload.max_tokens.unwrap_or(self.default_max_tokens),
            stream: false,
        }
    }
}

impl RemoteService for ChatCompletions {
    fn name(&self) -> &'static str {
        "chat-completions"
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "api-key".to_string(),
            self.api_key.expose_secret().to_string(),
        );
        headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
        headers
    }
}
