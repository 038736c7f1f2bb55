//! Speech-synthesis relay target
//!
//! Wraps the caller's text in an SSML document and posts it to the
//! region-scoped synthesis endpoint. Voice and output format are
//! per-request, so the target is constructed per request.

use crate::config::{vars, ConfigError, ConfigResult, SecretString, SpeechSettings};
use crate::providers::adapter::RemoteService;
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";
pub const DEFAULT_FORMAT: &str = "audio-24khz-160kbitrate-mono-mp3";

/// Remote text-to-speech endpoint
pub struct SpeechSynthesis {
    url: Url,
    api_key: SecretString,
    voice: String,
    format: String,
}

impl SpeechSynthesis {
    pub fn new(
        settings: SpeechSettings<'_>,
        voice: Option<&str>,
        format: Option<&str>,
    ) -> ConfigResult<Self> {
        // an explicit endpoint wins over the region-derived URL
        let (name, raw) = match (settings.endpoint, settings.region) {
            (Some(endpoint), _) => (vars::SPEECH_ENDPOINT, endpoint.to_string()),
            (None, Some(region)) => (
                vars::SPEECH_REGION,
                format!(
                    "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
                    region
                ),
            ),
            (None, None) => {
                return Err(ConfigError::missing([vars::SPEECH_REGION]));
            }
        };
        let url = Url::parse(&raw).map_err(|e| ConfigError::InvalidEndpoint {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            url,
            api_key: settings.api_key.clone(),
            voice: voice.unwrap_or(DEFAULT_VOICE).to_string(),
            format: format.unwrap_or(DEFAULT_FORMAT).to_string(),
        })
    }

    /// Build the SSML document for one utterance
    pub fn ssml(&self, text: &str) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
             <speak version=\"1.0\" xml:lang=\"en-US\">\n  \
             <voice name=\"{}\">{}</voice>\n\
             </speak>",
            escape_xml(&self.voice),
            escape_xml(text)
        )
    }

    /// Content type of the audio the remote will produce for this format
    pub fn audio_content_type(&self) -> &'static str {
        let format = self.format.to_ascii_lowercase();
        if format.contains("pcm") || format.contains("riff") {
            "audio/wav"
        } else if format.contains("ogg") {
            "audio/ogg"
        } else {
            "audio/mpeg"
        }
    }
}

impl RemoteService for SpeechSynthesis {
    fn name(&self) -> &'static str {
        "speech-synthesis"
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
            "application/ssml+xml".to_string(),
        );
        headers.insert("X-Microsoft-OutputFormat".to_string(), self.format.clone());
        headers
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
