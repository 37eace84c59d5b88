//! Groq client: chat completions for the voice assistant persona and
//! Whisper transcription for uploaded audio.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ProviderError, PROVIDER_TIMEOUT_SECS};

const GROQ_CHAT_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_TRANSCRIPTION_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";

pub const CHAT_MODEL: &str = "llama-3.1-70b-versatile";
pub const WHISPER_MODEL: &str = "whisper-large-v3-turbo";

/// Token cap for regular assistant replies.
pub const MAX_REPLY_TOKENS: u32 = 500;
/// Token cap for the one-sentence introduction.
pub const MAX_INTRO_TOKENS: u32 = 50;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Clone)]
pub struct GroqClient {
    client: Client,
    api_key: String,
}

impl GroqClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(PROVIDER_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Sends a chat completion with a system prompt and an optional user turn.
    /// The introduction greeting is system-prompt only, hence `user` is optional.
    pub async fn chat(
        &self,
        system: &str,
        user: Option<&str>,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let mut messages = vec![ChatMessage {
            role: "system",
            content: system,
        }];
        if let Some(content) = user {
            messages.push(ChatMessage {
                role: "user",
                content,
            });
        }

        let request_body = ChatRequest {
            model: CHAT_MODEL,
            messages,
            temperature: 0.2,
            max_tokens,
            top_p: 1.0,
            stream: false,
        };

        let response = self
            .client
            .post(GROQ_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
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

        let chat_response: ChatResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(ProviderError::EmptyContent)
    }

    /// Transcribes an audio file via Whisper.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        file_name: &str,
    ) -> Result<String, ProviderError> {
        debug!("Transcribing {} bytes of audio ({file_name})", audio.len());

        let part = Part::bytes(audio)
            .file_name(file_name.to_string())
            .mime_str("audio/wav")?;

        let form = Form::new()
            .part("file", part)
            .text("model", WHISPER_MODEL)
            .text("response_format", "json")
            .text("temperature", "0.0");

        let response = self
            .client
            .post(GROQ_TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
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

        let transcription: TranscriptionResponse = response.json().await?;

        if transcription.text.is_empty() {
            return Err(ProviderError::EmptyContent);
        }
        Ok(transcription.text)
    }
}
