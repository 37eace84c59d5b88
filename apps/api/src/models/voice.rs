use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One voice-assistant exchange: what the user said and what the bot replied.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VoiceInteractionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_input: String,
    pub bot_response: String,
    pub is_introduction: bool,
    pub created_at: DateTime<Utc>,
}
