//! Axum route handlers for the voice assistant.
//!
//! Audio pipeline: Whisper transcription (Groq) -> persona chat (Groq) ->
//! speech synthesis (Deepgram). Replies are returned as text plus
//! base64-encoded audio and recorded per user for the daily history view.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::voice::VoiceInteractionRow;
use crate::providers::groq::{MAX_INTRO_TOKENS, MAX_REPLY_TOKENS};
use crate::state::AppState;
use crate::voice::prompts::{ASSISTANT_SYSTEM_PROMPT, INTRO_SYSTEM_PROMPT};

/// Multipart field name carrying the audio recording.
const AUDIO_FIELD: &str = "audio";

/// The greeting flag expires after a day, so returning users get greeted
/// again each morning. Lost flags (Redis restart) just repeat the greeting.
const GREETING_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct TextInputRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub text: String,
    /// Base64-encoded synthesized speech.
    pub audio: String,
}

/// POST /api/voiceassistant/process
pub async fn handle_process_audio(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<AssistantReply>, AppError> {
    let (file_name, audio) = read_audio_field(&mut multipart).await?;

    let transcript = state.groq.transcribe(audio, &file_name).await?;
    if transcript.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not understand the recording".to_string(),
        ));
    }

    reply_and_record(&state, &auth, &transcript).await
}

/// POST /api/voiceassistant/process-text
pub async fn handle_process_text(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<TextInputRequest>,
) -> Result<Json<AssistantReply>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("Text input is required".to_string()));
    }
    reply_and_record(&state, &auth, &req.text).await
}

/// GET /api/voiceassistant/greeting
///
/// Generates the introduction once per TTL window per user; within the
/// window the endpoint answers 204 and the client skips the greeting.
pub async fn handle_greeting(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;

    let mut redis = state.redis.get_multiplexed_async_connection().await?;
    let key = greeting_key(auth.id);

    let already_greeted: bool = redis.exists(&key).await?;
    if already_greeted {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let text = state
        .groq
        .chat(INTRO_SYSTEM_PROMPT, None, MAX_INTRO_TOKENS)
        .await?;
    let audio = state.deepgram.speak(&text).await?;

    let _: () = redis.set_ex(&key, 1, GREETING_TTL_SECS).await?;
    record_interaction(&state, auth.id, "[greeting]", &text, true).await?;
    info!("Greeted user {}", auth.public_id);

    Ok(Json(AssistantReply {
        text,
        audio: BASE64.encode(audio),
    })
    .into_response())
}

/// GET /api/voiceassistant/history/today
pub async fn handle_today_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<VoiceInteractionRow>>, AppError> {
    let interactions: Vec<VoiceInteractionRow> = sqlx::query_as(
        r#"
        SELECT * FROM voice_interactions
        WHERE user_id = $1 AND created_at >= date_trunc('day', now())
        ORDER BY created_at ASC
        "#,
    )
    .bind(auth.id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(interactions))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn greeting_key(user_id: Uuid) -> String {
    format!("voice:greeted:{user_id}")
}

async fn reply_and_record(
    state: &AppState,
    auth: &AuthUser,
    user_input: &str,
) -> Result<Json<AssistantReply>, AppError> {
    let text = state
        .groq
        .chat(ASSISTANT_SYSTEM_PROMPT, Some(user_input), MAX_REPLY_TOKENS)
        .await?;
    let audio = state.deepgram.speak(&text).await?;

    record_interaction(state, auth.id, user_input, &text, false).await?;

    Ok(Json(AssistantReply {
        text,
        audio: BASE64.encode(audio),
    }))
}

async fn record_interaction(
    state: &AppState,
    user_id: Uuid,
    user_input: &str,
    bot_response: &str,
    is_introduction: bool,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO voice_interactions (user_id, user_input, bot_response, is_introduction)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(user_input)
    .bind(bot_response)
    .bind(is_introduction)
    .execute(&state.db)
    .await?;
    Ok(())
}

async fn read_audio_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some(AUDIO_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "audio.wav".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        if data.is_empty() {
            return Err(AppError::Validation("Audio recording is empty".to_string()));
        }
        return Ok((file_name, data.to_vec()));
    }
    Err(AppError::Validation("Audio input is required".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_key_is_per_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_ne!(greeting_key(a), greeting_key(b));
        assert!(greeting_key(a).starts_with("voice:greeted:"));
    }
}
