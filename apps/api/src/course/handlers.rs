//! Axum route handlers for training course outline generation.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::course::prompts::build_course_prompt;
use crate::errors::AppError;
use crate::models::course::{CourseOutline, GeneratedCourseRow};
use crate::providers::extract_json_object;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCourseRequest {
    pub job_description: String,
    pub technology_stack: String,
    pub duration: u32,
    pub training_level: String,
}

/// POST /api/courses/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<GenerateCourseRequest>,
) -> Result<Json<GeneratedCourseRow>, AppError> {
    validate_request(&req)?;

    // The request is logged before the provider call so failed generations
    // remain auditable.
    let request_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO course_requests
            (user_id, job_description, technology_stack, duration_weeks, training_level)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(auth.id)
    .bind(&req.job_description)
    .bind(&req.technology_stack)
    .bind(req.duration as i32)
    .bind(&req.training_level)
    .fetch_one(&state.db)
    .await?;

    let prompt = build_course_prompt(
        &req.job_description,
        &req.technology_stack,
        req.duration,
        &req.training_level,
    );
    let content = state.openai.chat(&prompt).await?;

    let json_object = extract_json_object(&content)
        .ok_or_else(|| AppError::Provider("Course generation returned no JSON object".to_string()))?;
    let outline: CourseOutline = serde_json::from_str(json_object)
        .map_err(|e| AppError::Provider(format!("Malformed course outline: {e}")))?;

    let course: GeneratedCourseRow = sqlx::query_as(
        r#"
        INSERT INTO generated_courses (course_request_id, user_id, outline)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(request_id)
    .bind(auth.id)
    .bind(serde_json::to_value(&outline).map_err(|e| AppError::Internal(e.into()))?)
    .fetch_one(&state.db)
    .await?;

    sqlx::query("UPDATE course_requests SET generated_course_id = $1 WHERE id = $2")
        .bind(course.id)
        .bind(request_id)
        .execute(&state.db)
        .await?;

    info!(
        "Generated course {} ('{}') for user {}",
        course.id, outline.course_title, auth.public_id
    );
    Ok(Json(course))
}

/// GET /api/courses/:id
pub async fn handle_get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<GeneratedCourseRow>, AppError> {
    let course: Option<GeneratedCourseRow> =
        sqlx::query_as("SELECT * FROM generated_courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    let course = course.ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    if course.user_id != auth.id {
        return Err(AppError::Forbidden);
    }
    Ok(Json(course))
}

fn validate_request(req: &GenerateCourseRequest) -> Result<(), AppError> {
    if req.job_description.trim().is_empty()
        || req.technology_stack.trim().is_empty()
        || req.training_level.trim().is_empty()
    {
        return Err(AppError::Validation("All fields are required".to_string()));
    }
    if req.duration == 0 {
        return Err(AppError::Validation(
            "Duration must be at least one week".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> GenerateCourseRequest {
        GenerateCourseRequest {
            job_description: "Backend engineer".to_string(),
            technology_stack: "Rust, Postgres".to_string(),
            duration: 6,
            training_level: "Beginner".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(validate_request(&valid_request()).is_ok());
    }

    #[test]
    fn test_blank_field_rejected() {
        let mut req = valid_request();
        req.technology_stack = "  ".to_string();
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut req = valid_request();
        req.duration = 0;
        assert!(validate_request(&req).is_err());
    }
}
