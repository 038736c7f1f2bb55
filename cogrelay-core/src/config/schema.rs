//! Gateway configuration snapshot
//!
//! The whole configuration is read from the process environment once at
//! startup into an immutable [`GatewayConfig`] that is passed into the
//! handlers. Loading only coerces types (numbers fall back to their
//! defaults when unparseable); whether the settings a handler *needs* are
//! actually present is checked per request via the `require()` views, so a
//! misconfigured deployment still serves `/health` and reports precisely
//! which variables are missing.

use super::error::{ConfigError, ConfigResult};
use super::secrets::SecretString;
use serde::Serialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable names, in one place
pub mod vars {
    pub const CHAT_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
    pub const CHAT_API_KEY: &str = "AZURE_OPENAI_API_KEY";
    pub const CHAT_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT";
    pub const CHAT_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
    pub const CHAT_SYSTEM_PROMPT: &str = "CHAT_SYSTEM_PROMPT";
    pub const CHAT_DEFAULT_TEMPERATURE: &str = "CHAT_DEFAULT_TEMPERATURE";
    pub const CHAT_DEFAULT_MAX_TOKENS: &str = "CHAT_DEFAULT_MAX_TOKENS";
    pub const FACE_ENDPOINT: &str = "FACE_API_ENDPOINT";
    pub const FACE_API_KEY: &str = "FACE_API_KEY";
    pub const SPEECH_REGION: &str = "SPEECH_REGION";
    pub const SPEECH_KEY: &str = "SPEECH_KEY";
    pub const SPEECH_ENDPOINT: &str = "SPEECH_ENDPOINT";
    pub const BIND_ADDR: &str = "RELAY_BIND_ADDR";
    pub const TIMEOUT_SECS: &str = "RELAY_TIMEOUT_SECS";
}

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Root configuration for the gateway process
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub chat: ChatConfig,
    pub face: FaceConfig,
    pub speech: SpeechConfig,
    pub server: ServerConfig,
}

impl GatewayConfig {
    /// Read the full configuration from the process environment
    pub fn from_env() -> Self {
        Self {
            chat: ChatConfig::from_env(),
            face: FaceConfig::from_env(),
            speech: SpeechConfig::from_env(),
            server: ServerConfig::from_env(),
        }
    }
}

/// Chat-completion relay settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the remote chat-completion resource
    pub endpoint: Option<String>,
    pub api_key: Option<SecretString>,
    /// Deployment (model instance) name on the remote resource
    pub deployment: Option<String>,
    pub api_version: String,
    /// Server-controlled system instruction, prepended to every conversation
    pub system_prompt: Option<String>,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            system_prompt: None,
            default_temperature: DEFAULT_TEMPERATURE,
            default_max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ChatConfig {
    fn from_env() -> Self {
        Self {
            endpoint: env_endpoint(vars::CHAT_ENDPOINT),
            api_key: env_opt(vars::CHAT_API_KEY).map(SecretString::new),
            deployment: env_opt(vars::CHAT_DEPLOYMENT),
            api_version: env_opt(vars::CHAT_API_VERSION)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            system_prompt: env_opt(vars::CHAT_SYSTEM_PROMPT),
            default_temperature: env_parsed(vars::CHAT_DEFAULT_TEMPERATURE, DEFAULT_TEMPERATURE),
            default_max_tokens: env_parsed(vars::CHAT_DEFAULT_MAX_TOKENS, DEFAULT_MAX_TOKENS),
        }
    }

    /// Resolve the settings the chat path cannot run without
    pub fn require(&self) -> ConfigResult<ChatSettings<'_>> {
        let endpoint = self.endpoint.as_deref();
        let api_key = self.api_key.as_ref().filter(|k| !k.is_empty());
        let deployment = self.deployment.as_deref();

        let mut missing = Vec::new();
        if endpoint.is_none() {
            missing.push(vars::CHAT_ENDPOINT);
        }
        if api_key.is_none() {
            missing.push(vars::CHAT_API_KEY);
        }
        if deployment.is_none() {
            missing.push(vars::CHAT_DEPLOYMENT);
        }

        match (endpoint, api_key, deployment) {
            (Some(endpoint), Some(api_key), Some(deployment)) => Ok(ChatSettings {
                endpoint,
                api_key,
                deployment,
                api_version: &self.api_version,
                system_prompt: self.system_prompt.as_deref(),
                default_temperature: self.default_temperature,
                default_max_tokens: self.default_max_tokens,
            }),
            _ => Err(ConfigError::missing(missing)),
        }
    }

    /// Presence booleans for the diagnostic endpoint. Never the values.
    pub fn presence(&self) -> ChatPresence {
        ChatPresence {
            endpoint: self.endpoint.is_some(),
            api_key: self.api_key.as_ref().is_some_and(|k| !k.is_empty()),
            deployment: self.deployment.is_some(),
            system_prompt: self.system_prompt.is_some(),
        }
    }
}

/// Fully-resolved view of [`ChatConfig`] with all required values present
#[derive(Debug, Clone, Copy)]
pub struct ChatSettings<'a> {
    pub endpoint: &'a str,
    pub api_key: &'a SecretString,
    pub deployment: &'a str,
    pub api_version: &'a str,
    pub system_prompt: Option<&'a str>,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

/// What the diagnostic endpoint reports about the chat configuration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ChatPresence {
    pub endpoint: bool,
    pub api_key: bool,
    pub deployment: bool,
    pub system_prompt: bool,
}

/// Face-detection relay settings
#[derive(Debug, Clone, Default)]
pub struct FaceConfig {
    /// Full URL of the remote face-detection operation
    pub endpoint: Option<String>,
    pub api_key: Option<SecretString>,
}

impl FaceConfig {
    fn from_env() -> Self {
        Self {
            endpoint: env_endpoint(vars::FACE_ENDPOINT),
            api_key: env_opt(vars::FACE_API_KEY).map(SecretString::new),
        }
    }

    pub fn require(&self) -> ConfigResult<FaceSettings<'_>> {
        let endpoint = self.endpoint.as_deref();
        let api_key = self.api_key.as_ref().filter(|k| !k.is_empty());

        let mut missing = Vec::new();
        if endpoint.is_none() {
            missing.push(vars::FACE_ENDPOINT);
        }
        if api_key.is_none() {
            missing.push(vars::FACE_API_KEY);
        }

        match (endpoint, api_key) {
            (Some(endpoint), Some(api_key)) => Ok(FaceSettings { endpoint, api_key }),
            _ => Err(ConfigError::missing(missing)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FaceSettings<'a> {
    pub endpoint: &'a str,
    pub api_key: &'a SecretString,
}

/// Speech-synthesis relay settings
#[derive(Debug, Clone, Default)]
pub struct SpeechConfig {
    /// Azure region hosting the speech resource, e.g. `westeurope`
    pub region: Option<String>,
    pub api_key: Option<SecretString>,
    /// Full synthesis URL; overrides the region-derived one when set
    pub endpoint: Option<String>,
}

impl SpeechConfig {
    fn from_env() -> Self {
        Self {
            region: env_opt(vars::SPEECH_REGION),
            api_key: env_opt(vars::SPEECH_KEY).map(SecretString::new),
            endpoint: env_endpoint(vars::SPEECH_ENDPOINT),
        }
    }

    pub fn require(&self) -> ConfigResult<SpeechSettings<'_>> {
        let api_key = self.api_key.as_ref().filter(|k| !k.is_empty());

        let mut missing = Vec::new();
        if self.region.is_none() && self.endpoint.is_none() {
            missing.push(vars::SPEECH_REGION);
        }
        if api_key.is_none() {
            missing.push(vars::SPEECH_KEY);
        }

        match api_key {
            Some(api_key) if missing.is_empty() => Ok(SpeechSettings {
                region: self.region.as_deref(),
                endpoint: self.endpoint.as_deref(),
                api_key,
            }),
            _ => Err(ConfigError::missing(missing)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpeechSettings<'a> {
    pub region: Option<&'a str>,
    pub endpoint: Option<&'a str>,
    pub api_key: &'a SecretString,
}

/// Process-level server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Upper bound on a single outbound relay call
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        Self {
            bind_addr: env_opt(vars::BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            request_timeout: Duration::from_secs(env_parsed(
                vars::TIMEOUT_SECS,
                DEFAULT_TIMEOUT_SECS,
            )),
        }
    }
}

/// Read an optional variable; empty or whitespace-only counts as absent
fn env_opt(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Err(_) => None,
    }
}

/// Read an endpoint variable, stripping any trailing slash
fn env_endpoint(name: &str) -> Option<String> {
    env_opt(name).map(|value| value.trim_end_matches('/').to_string())
}

/// Read a numeric variable, falling back to the default when unset or unparseable
fn env_parsed<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match env_opt(name) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("{} has unparseable value {:?}, using {}", name, raw, default);
                default
            }
        },
        None => default,
    }
}
