//! Configuration for the cogrelay gateway
//!
//! Settings are read from the process environment once at startup into an
//! immutable snapshot that is passed explicitly into the handlers; there is
//! no global configuration state. Required values are checked per request
//! via the `require()` views so that a misconfigured process still starts
//! and reports what is missing.

mod error;
mod schema;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    vars, ChatConfig, ChatPresence, ChatSettings, FaceConfig, FaceSettings, GatewayConfig,
    ServerConfig, SpeechConfig, SpeechSettings, DEFAULT_API_VERSION, DEFAULT_BIND_ADDR,
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
pub use secrets::SecretString;
