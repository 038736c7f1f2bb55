//! Face-detection relay target
//!
//! The image path is a pure proxy: the caller's bytes go out unmodified,
//! the remote's JSON comes back verbatim. The only additions are the
//! `returnFaceAttributes=emotion` query parameter and the subscription-key
//! header.

use crate::config::{vars, ConfigError, ConfigResult, FaceSettings, SecretString};
use crate::providers::adapter::RemoteService;
use std::collections::HashMap;
use url::Url;

/// Remote face-detection endpoint, queried for emotion attributes
pub struct FaceDetection {
    url: Url,
    api_key: SecretString,
}

impl FaceDetection {
    pub fn new(settings: FaceSettings<'_>) -> ConfigResult<Self> {
        let mut url = Url::parse(settings.endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            name: vars::FACE_ENDPOINT.to_string(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut()
            .append_pair("returnFaceAttributes", "emotion");

        Ok(Self {
            url,
            api_key: settings.api_key.clone(),
        })
    }
}

impl RemoteService for FaceDetection {
    fn name(&self) -> &'static str {
        "face-detection"
    }

    fn url(&self) -> &Url {
        &self.url
    }

    fn headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert(
            "Ocp-Apim-Subscription-Key".to_string(),
            self.api_key.expose_secret().to_string(),
        );
        headers.insert(
            "Content-Type".to_string(),
            "application/octet-stream".to_string(),
        );
        headers
    }
}
