use aws_sdk_s3::Client as S3Client;
use redis::Client as RedisClient;
use sqlx::PgPool;

use crate::config::Config;
use crate::providers::deepgram::DeepgramClient;
use crate::providers::groq::GroqClient;
use crate::providers::openai::OpenAiClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Redis holds the short-lived "user already greeted" flag.
    /// Losing it on restart is acceptable; the user just gets greeted again.
    pub redis: RedisClient,
    /// S3 / MinIO bucket for uploaded resume files.
    pub s3: S3Client,
    pub openai: OpenAiClient,
    pub groq: GroqClient,
    pub deepgram: DeepgramClient,
    pub config: Config,
}
