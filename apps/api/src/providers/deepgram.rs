//! Deepgram text-to-speech client (Aura voices).

use reqwest::Client;
use serde_json::json;
use tracing::debug;

use super::{ProviderError, PROVIDER_TIMEOUT_SECS};

const DEEPGRAM_SPEAK_URL: &str = "https://api.deepgram.com/v1/speak";

pub const VOICE_MODEL: &str = "aura-asteria-en";

#[derive(Clone)]
pub struct DeepgramClient {
    client: Client,
    api_key: String,
}

impl DeepgramClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Synthesizes speech for the given text, returning raw audio bytes.
    pub async fn speak(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        let response = self
            .client
            .post(DEEPGRAM_SPEAK_URL)
            .query(&[("model", VOICE_MODEL)])
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&json!({ "text": text }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await?.to_vec();
        debug!("Deepgram returned {} bytes of audio", audio.len());

        if audio.is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(audio)
    }
}
