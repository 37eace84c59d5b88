mod assessment;
mod auth;
mod config;
mod course;
mod db;
mod errors;
mod models;
mod providers;
mod resume;
mod routes;
mod state;
mod voice;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::providers::deepgram::DeepgramClient;
use crate::providers::groq::GroqClient;
use crate::providers::openai::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentHarness API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize Redis (greeting flags)
    let redis = redis::Client::open(config.redis_url.clone())?;
    info!("Redis client initialized");

    // Initialize S3 / MinIO (resume uploads)
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized");

    // Initialize AI provider clients
    let openai = OpenAiClient::new(config.openai_api_key.clone());
    info!("OpenAI client initialized (model: {})", providers::openai::MODEL);
    let groq = GroqClient::new(config.groq_api_key.clone());
    info!(
        "Groq client initialized (chat: {}, transcription: {})",
        providers::groq::CHAT_MODEL,
        providers::groq::WHISPER_MODEL
    );
    let deepgram = DeepgramClient::new(config.deepgram_api_key.clone());
    info!(
        "Deepgram client initialized (voice: {})",
        providers::deepgram::VOICE_MODEL
    );

    // Build app state
    let state = AppState {
        db,
        redis,
        s3,
        openai,
        groq,
        deepgram,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "talent-harness-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
