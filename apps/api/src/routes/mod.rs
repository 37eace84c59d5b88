pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{assessment, auth, course, resume, voice};

/// Uploads (resume PDFs, audio recordings) are capped at 50 MB.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth & user profile
        .route("/api/signup", post(auth::handlers::handle_signup))
        .route("/api/login", post(auth::handlers::handle_login))
        .route(
            "/api/user",
            get(auth::handlers::handle_get_user).put(auth::handlers::handle_update_user),
        )
        .route("/api/user/activity", get(auth::handlers::handle_get_activity))
        // Assessments
        .route(
            "/api/assessments/create",
            post(assessment::handlers::handle_create),
        )
        .route(
            "/api/assessments/:id/answers",
            post(assessment::handlers::handle_record_answers),
        )
        .route(
            "/api/assessments/submit",
            post(assessment::handlers::handle_submit),
        )
        .route(
            "/api/assessments/result/:id",
            get(assessment::handlers::handle_result),
        )
        // Courses
        .route("/api/courses/generate", post(course::handlers::handle_generate))
        .route("/api/courses/:id", get(course::handlers::handle_get))
        // Resumes
        .route("/api/resumes/upload", post(resume::handlers::handle_upload))
        .route("/api/resumes", get(resume::handlers::handle_history))
        .route(
            "/api/resumes/:id/analyze",
            post(resume::handlers::handle_analyze),
        )
        .route(
            "/api/resumes/:id/analysis",
            get(resume::handlers::handle_get_analysis),
        )
        // Voice assistant
        .route(
            "/api/voiceassistant/process",
            post(voice::handlers::handle_process_audio),
        )
        .route(
            "/api/voiceassistant/process-text",
            post(voice::handlers::handle_process_text),
        )
        .route(
            "/api/voiceassistant/greeting",
            get(voice::handlers::handle_greeting),
        )
        .route(
            "/api/voiceassistant/history/today",
            get(voice::handlers::handle_today_history),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
