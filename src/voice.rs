use anyhow::{anyhow, Result};
use bytes::Bytes;
use reqwest::Client;
use serde::Serialize;

/// Body of the voice-generation request. Field order matters for the wire
/// format: `text` first, then `persona`.
#[derive(Serialize)]
pub struct VoiceRequest {
    pub text: String,
    pub persona: String,
}

/// Client for the external voice-generation service. One POST per user
/// submission, raw audio bytes back on success.
#[derive(Clone)]
pub struct VoiceClient {
    client: Client,
    base_url: String,
}

impl VoiceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a voice response for `text` spoken as `persona_id`.
    ///
    /// Transport errors and non-2xx statuses are collapsed into one failure;
    /// the caller does not distinguish them.
    pub async fn generate(&self, text: &str, persona_id: &str) -> Result<Bytes> {
        let url = format!("{}/generate-voice", self.base_url);

        let request = VoiceRequest {
            text: text.to_string(),
            persona: persona_id.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "voice generation failed with status: {}",
                response.status()
            ));
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(anyhow!("voice generation returned an empty payload"));
        }

        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_wire_format() {
        let request = VoiceRequest {
            text: "hello".to_string(),
            persona: "nikhil".to_string(),
        };
        let body = serde_json::to_string(&request).unwrap();
        assert_eq!(body, r#"{"text":"hello","persona":"nikhil"}"#);
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = VoiceClient::new("http://localhost:8081/");
        assert_eq!(client.base_url(), "http://localhost:8081");
    }
}
