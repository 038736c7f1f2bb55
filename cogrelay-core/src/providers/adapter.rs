//! Remote service descriptor trait
//!
//! Each relay target implements [`RemoteService`]: a resolved request URL
//! plus the headers that authorize the call. The relay client is generic
//! over this trait, so adding a service never touches the HTTP layer.

use std::collections::HashMap;
use url::Url;

/// A remote endpoint the gateway can relay to
pub trait RemoteService: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Fully-resolved request URL, including any query parameters
    fn url(&self) -> &Url;

    /// Headers required by this service, including authorization.
    ///
    /// Values may contain secrets; they go straight onto the outbound
    /// request and must never be logged.
    fn headers(&self) -> HashMap<String, String>;
}
