//! Axum route handlers for resume upload, analysis, and history.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::{status, ResumeAnalysisDoc, ResumeAnalysisRow, ResumeRow};
use crate::providers::extract_json_object;
use crate::resume::extract::{extract_pdf_text, is_supported};
use crate::resume::prompts::build_analysis_prompt;
use crate::state::AppState;

/// Multipart field name carrying the resume file.
const FILE_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub resume_id: Uuid,
    pub file_name: String,
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub resume_id: Uuid,
    /// True when a stored analysis was served without a provider call.
    pub cached: bool,
    pub analysis: Value,
}

/// POST /api/resumes/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let (file_name, data) = read_file_field(&mut multipart).await?;

    if !is_supported(&file_name) {
        return Err(AppError::Validation(
            "Unsupported file format. Please upload a PDF file.".to_string(),
        ));
    }
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let s3_key = format!("resumes/{}/{}-{}", auth.id, Uuid::new_v4(), file_name);
    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&s3_key)
        .body(ByteStream::from(data.to_vec()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes (user_id, file_name, s3_key)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(auth.id)
    .bind(&file_name)
    .bind(&s3_key)
    .fetch_one(&state.db)
    .await?;

    info!("Stored resume {} at s3://{}/{s3_key}", resume.id, state.config.s3_bucket);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            resume_id: resume.id,
            file_name: resume.file_name,
            uploaded_at: resume.uploaded_at,
        }),
    ))
}

/// POST /api/resumes/:id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let resume = load_owned(&state, id, &auth).await?;

    // A resume is analyzed at most once; later calls serve the stored result.
    let existing: Option<ResumeAnalysisRow> =
        sqlx::query_as("SELECT * FROM resume_analyses WHERE resume_id = $1 AND user_id = $2")
            .bind(resume.id)
            .bind(auth.id)
            .fetch_optional(&state.db)
            .await?;
    if let Some(row) = existing {
        return Ok(Json(AnalyzeResponse {
            resume_id: resume.id,
            cached: true,
            analysis: row.analysis,
        }));
    }

    match analyze_fresh(&state, &auth, &resume).await {
        Ok(analysis) => Ok(Json(AnalyzeResponse {
            resume_id: resume.id,
            cached: false,
            analysis,
        })),
        Err(e) => {
            // Keep the failure visible in the upload history.
            if let Err(update_err) =
                sqlx::query("UPDATE resumes SET status = $2 WHERE id = $1")
                    .bind(resume.id)
                    .bind(status::FAILED)
                    .execute(&state.db)
                    .await
            {
                error!("Failed to mark resume {} as failed: {update_err}", resume.id);
            }
            Err(e)
        }
    }
}

/// GET /api/resumes
pub async fn handle_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes: Vec<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC")
            .bind(auth.id)
            .fetch_all(&state.db)
            .await?;
    Ok(Json(resumes))
}

/// GET /api/resumes/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeAnalysisRow>, AppError> {
    let analysis: Option<ResumeAnalysisRow> =
        sqlx::query_as("SELECT * FROM resume_analyses WHERE resume_id = $1 AND user_id = $2")
            .bind(id)
            .bind(auth.id)
            .fetch_optional(&state.db)
            .await?;
    let analysis = analysis.ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;
    Ok(Json(analysis))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_owned(state: &AppState, id: Uuid, auth: &AuthUser) -> Result<ResumeRow, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let resume = resume.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;
    if resume.user_id != auth.id {
        return Err(AppError::Forbidden);
    }
    Ok(resume)
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("File name is required".to_string()))?;
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        return Ok((file_name, data));
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

async fn analyze_fresh(
    state: &AppState,
    auth: &AuthUser,
    resume: &ResumeRow,
) -> Result<Value, AppError> {
    let object = state
        .s3
        .get_object()
        .bucket(&state.config.s3_bucket)
        .key(&resume.s3_key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;
    let bytes = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?
        .into_bytes();

    let resume_text = extract_pdf_text(&bytes).map_err(AppError::Validation)?;

    let content = state
        .openai
        .chat(&build_analysis_prompt(&resume_text))
        .await?;
    let json_object = extract_json_object(&content)
        .ok_or_else(|| AppError::Provider("Resume analysis returned no JSON object".to_string()))?;
    // Validate structure before persisting.
    let doc: ResumeAnalysisDoc = serde_json::from_str(json_object)
        .map_err(|e| AppError::Provider(format!("Malformed resume analysis: {e}")))?;
    let analysis = serde_json::to_value(&doc).map_err(|e| AppError::Internal(e.into()))?;

    sqlx::query(
        r#"
        INSERT INTO resume_analyses (user_id, resume_id, file_name, resume_text, analysis)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(auth.id)
    .bind(resume.id)
    .bind(&resume.file_name)
    .bind(&resume_text)
    .bind(&analysis)
    .execute(&state.db)
    .await?;

    sqlx::query("UPDATE resumes SET status = $2 WHERE id = $1")
        .bind(resume.id)
        .bind(status::ANALYZED)
        .execute(&state.db)
        .await?;

    info!("Analyzed resume {} for user {}", resume.id, auth.public_id);
    Ok(analysis)
}
