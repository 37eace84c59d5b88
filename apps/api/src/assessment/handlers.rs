//! Axum route handlers for the assessment flow.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::competencies::{competencies_for, FALLBACK_COMPETENCIES, LEVELS, TECHNOLOGIES};
use crate::assessment::prompts::build_question_prompt;
use crate::assessment::questions::normalize_generated;
use crate::assessment::scoring::{normalize_answers, score_submission, Scored};
use crate::assessment::session::Session;
use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::assessment::{AssessmentRow, Question, QuestionPublic};
use crate::providers::extract_json_array;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateAssessmentRequest {
    pub technology: String,
    pub level: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssessmentResponse {
    pub assessment_id: Uuid,
    pub questions: Vec<QuestionPublic>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordAnswersRequest {
    /// 1-based choice per question, `null`/0 for unanswered. An answer may be
    /// revised any number of times before submission.
    pub answers: Vec<Option<u8>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    pub assessment_id: Uuid,
    pub user_answers: Vec<Option<u8>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentResponse {
    pub score: u32,
    pub total_questions: usize,
    pub percentage_score: f64,
    pub result: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/assessments/create
pub async fn handle_create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAssessmentRequest>,
) -> Result<(StatusCode, Json<CreateAssessmentResponse>), AppError> {
    if !TECHNOLOGIES.contains(&req.technology.as_str()) {
        return Err(AppError::Validation(format!(
            "Unknown technology '{}'",
            req.technology
        )));
    }
    if !LEVELS.contains(&req.level.as_str()) {
        return Err(AppError::Validation(format!("Unknown level '{}'", req.level)));
    }

    let competencies = competencies_for(&req.technology).unwrap_or(&FALLBACK_COMPETENCIES);
    let prompt = build_question_prompt(&req.technology, &req.level, competencies);
    let content = state.openai.chat(&prompt).await?;

    let json_array = extract_json_array(&content)
        .ok_or_else(|| AppError::Provider("Question generation returned no JSON array".to_string()))?;
    let raw: Vec<Question> = serde_json::from_str(json_array)
        .map_err(|e| AppError::Provider(format!("Malformed question payload: {e}")))?;
    let questions = normalize_generated(raw).map_err(AppError::Provider)?;

    let assessment_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO assessments (user_id, technology, level, questions)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(auth.id)
    .bind(&req.technology)
    .bind(&req.level)
    .bind(serde_json::to_value(&questions).map_err(|e| AppError::Internal(e.into()))?)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Created assessment {assessment_id} ({} {} questions) for user {}",
        req.technology,
        questions.len(),
        auth.public_id
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateAssessmentResponse {
            assessment_id,
            questions: questions.iter().map(QuestionPublic::from).collect(),
        }),
    ))
}

/// POST /api/assessments/:id/answers
pub async fn handle_record_answers(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RecordAnswersRequest>,
) -> Result<StatusCode, AppError> {
    let assessment = load_owned(&state, id, &auth).await?;
    let questions = parse_questions(&assessment)?;
    validate_answer_values(&req.answers, questions.len())?;

    let session = Session::new(assessment.created_at, assessment.submitted);
    if let Err(e) = session.check_record_answer(Utc::now()) {
        // The budget may have lapsed with answers on file; finalize first so
        // the recorded drafts become the graded submission.
        if !assessment.submitted {
            finalize_expired(&state, &assessment).await?;
        }
        return Err(AppError::Conflict(e.message().to_string()));
    }

    let updated = sqlx::query(
        "UPDATE assessments SET draft_answers = $2 WHERE id = $1 AND submitted = FALSE",
    )
    .bind(id)
    .bind(serde_json::to_value(&req.answers).map_err(|e| AppError::Internal(e.into()))?)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        // Raced with a concurrent submission.
        return Err(AppError::Conflict(
            "Assessment has already been submitted".to_string(),
        ));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/assessments/submit
pub async fn handle_submit(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SubmitAssessmentRequest>,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    let assessment = load_owned(&state, req.assessment_id, &auth).await?;
    let questions = parse_questions(&assessment)?;
    validate_answer_values(&req.user_answers, questions.len())?;

    let session = Session::new(assessment.created_at, assessment.submitted);
    if let Err(e) = session.check_submit(Utc::now()) {
        // A late submission never grades the payload; whatever drafts were
        // recorded in time become the result instead.
        if !assessment.submitted {
            finalize_expired(&state, &assessment).await?;
        }
        return Err(AppError::Conflict(e.message().to_string()));
    }

    let answers = normalize_answers(&req.user_answers, questions.len());
    let declared = competencies_for(&assessment.technology).unwrap_or(&[]);
    let scored = score_submission(&questions, &answers, declared);

    commit_result(&state, &assessment, &answers, &scored).await?;

    info!(
        "Assessment {} submitted: {}/{} correct",
        assessment.id,
        scored.score,
        questions.len()
    );

    Ok(Json(SubmitAssessmentResponse {
        score: scored.score,
        total_questions: questions.len(),
        percentage_score: scored.percentage_score,
        result: serde_json::to_value(&scored.result).map_err(|e| AppError::Internal(e.into()))?,
    }))
}

/// GET /api/assessments/result/:id
pub async fn handle_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SubmitAssessmentResponse>, AppError> {
    let mut assessment = load_owned(&state, id, &auth).await?;

    if !assessment.submitted {
        let session = Session::new(assessment.created_at, false);
        if !session.is_expired(Utc::now()) {
            return Err(AppError::Conflict(
                "Assessment has not been submitted yet".to_string(),
            ));
        }
        // Expired but never submitted: auto-finalize from the recorded drafts
        // and serve the derived result.
        finalize_expired(&state, &assessment).await?;
        assessment = load_owned(&state, id, &auth).await?;
    }

    let questions = parse_questions(&assessment)?;
    let score = assessment.score.unwrap_or(0).max(0) as u32;
    let percentage_score = if questions.is_empty() {
        0.0
    } else {
        100.0 * f64::from(score) / questions.len() as f64
    };

    Ok(Json(SubmitAssessmentResponse {
        score,
        total_questions: questions.len(),
        percentage_score,
        result: assessment.result.clone().unwrap_or(Value::Null),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_owned(
    state: &AppState,
    id: Uuid,
    auth: &AuthUser,
) -> Result<AssessmentRow, AppError> {
    let assessment: Option<AssessmentRow> =
        sqlx::query_as("SELECT * FROM assessments WHERE id = $1")
            .bind(id)
            .fetch_optional(&state.db)
            .await?;
    let assessment =
        assessment.ok_or_else(|| AppError::NotFound("Assessment not found".to_string()))?;
    if assessment.user_id != auth.id {
        return Err(AppError::Forbidden);
    }
    Ok(assessment)
}

fn parse_questions(assessment: &AssessmentRow) -> Result<Vec<Question>, AppError> {
    assessment
        .questions()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Corrupt question document: {e}")))
}

fn validate_answer_values(answers: &[Option<u8>], question_count: usize) -> Result<(), AppError> {
    if answers.len() != question_count {
        return Err(AppError::Validation(format!(
            "Expected {question_count} answers, got {}",
            answers.len()
        )));
    }
    if answers.iter().flatten().any(|&choice| choice > 4) {
        return Err(AppError::Validation(
            "Each answer must be null or a choice number between 0 and 4".to_string(),
        ));
    }
    Ok(())
}

/// Finalizes an expired, never-submitted assessment from its recorded draft
/// answers (unanswered questions grade as incorrect). Loses the race politely:
/// if another request finalized first, the conditional update is a no-op.
async fn finalize_expired(state: &AppState, assessment: &AssessmentRow) -> Result<(), AppError> {
    let questions = parse_questions(assessment)?;
    let drafts = assessment.draft_answers(questions.len());
    let answers = normalize_answers(&drafts, questions.len());
    let declared = competencies_for(&assessment.technology).unwrap_or(&[]);
    let scored = score_submission(&questions, &answers, declared);

    warn!(
        "Auto-submitting expired assessment {} ({}/{} from drafts)",
        assessment.id,
        scored.score,
        questions.len()
    );
    commit_result(state, assessment, &answers, &scored).await
}

/// Writes the graded submission. The `submitted = FALSE` predicate is the
/// critical section: of two concurrent submissions exactly one lands, the
/// other observes zero affected rows.
async fn commit_result(
    state: &AppState,
    assessment: &AssessmentRow,
    answers: &[i32],
    scored: &Scored,
) -> Result<(), AppError> {
    let updated = sqlx::query(
        r#"
        UPDATE assessments
        SET user_answers = $2, score = $3, result = $4, submitted = TRUE
        WHERE id = $1 AND submitted = FALSE
        "#,
    )
    .bind(assessment.id)
    .bind(answers)
    .bind(scored.score as i32)
    .bind(serde_json::to_value(&scored.result).map_err(|e| AppError::Internal(e.into()))?)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(AppError::Conflict(
            "Assessment has already been submitted".to_string(),
        ));
    }

    sqlx::query("UPDATE users SET last_assessment_id = $1 WHERE id = $2")
        .bind(assessment.id)
        .bind(assessment.user_id)
        .execute(&state.db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_count_must_match_questions() {
        assert!(validate_answer_values(&[Some(1), Some(2)], 3).is_err());
        assert!(validate_answer_values(&[Some(1), Some(2), None], 3).is_ok());
    }

    #[test]
    fn test_choice_above_four_rejected() {
        assert!(validate_answer_values(&[Some(5)], 1).is_err());
    }

    #[test]
    fn test_zero_and_null_accepted_as_unanswered() {
        assert!(validate_answer_values(&[Some(0), None], 2).is_ok());
    }
}
