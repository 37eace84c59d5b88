//! Axum route handlers for signup, login, and the user profile endpoints.

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{password, token, AuthUser};
use crate::errors::AppError;
use crate::models::assessment::AssessmentSummaryRow;
use crate::models::user::{generate_public_id, UserProfile, UserRow};
use crate::state::AppState;

pub const GENDERS: [&str; 4] = ["male", "female", "other", "prefer-not-to-say"];
pub const EDUCATION_LEVELS: [&str; 5] = ["high-school", "bachelors", "masters", "phd", "other"];

const MIN_PASSWORD_LEN: usize = 6;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub education: String,
    pub occupation: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Login time before this one; the profile's `last_login` is already
    /// updated to now.
    pub previous_login: Option<chrono::DateTime<Utc>>,
    pub last_assessment: Option<AssessmentSummaryRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub education: Option<String>,
    pub occupation: Option<String>,
    pub profile_picture: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserActivity {
    pub last_login: Option<chrono::DateTime<Utc>>,
    pub assessments: Vec<AssessmentSummaryRow>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    validate_signup(&req)?;

    let existing: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;
    let public_id = generate_public_id();

    let user: UserRow = sqlx::query_as(
        r#"
        INSERT INTO users
            (public_id, name, email, password_hash, phone_number,
             date_of_birth, gender, education, occupation)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&public_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&password_hash)
    .bind(&req.phone_number)
    .bind(req.date_of_birth)
    .bind(&req.gender)
    .bind(&req.education)
    .bind(&req.occupation)
    .fetch_one(&state.db)
    .await?;

    info!("Registered user {} ({})", user.public_id, user.id);

    let token = token::issue(&state.config.jwt_secret, user.id, &user.name)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))?;
    Ok(Json(TokenResponse { token }))
}

/// POST /api/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    // Same response for unknown email and wrong password.
    let user = user.ok_or_else(|| AppError::Validation("Invalid credentials".to_string()))?;
    if !password::verify_password(&req.password, &user.password_hash) {
        return Err(AppError::Validation("Invalid credentials".to_string()));
    }

    let previous_login = user.last_login;
    let now = Utc::now();
    sqlx::query("UPDATE users SET last_login = $1 WHERE id = $2")
        .bind(now)
        .bind(user.id)
        .execute(&state.db)
        .await?;

    let last_assessment = match user.last_assessment_id {
        Some(assessment_id) => {
            sqlx::query_as::<_, AssessmentSummaryRow>(
                r#"
                SELECT id, technology, level, score, submitted, created_at, result
                FROM assessments WHERE id = $1
                "#,
            )
            .bind(assessment_id)
            .fetch_optional(&state.db)
            .await?
        }
        None => None,
    };

    let mut profile = UserProfile::from(&user);
    profile.last_login = Some(now);

    let token = token::issue(&state.config.jwt_secret, user.id, &user.name)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))?;

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            profile,
            previous_login,
            last_assessment,
        },
    }))
}

/// GET /api/user
pub async fn handle_get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, AppError> {
    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;

    let activity = fetch_activity(&state, &user).await?;
    Ok(Json(json!({
        "user": UserProfile::from(&user),
        "userActivity": activity,
    })))
}

/// PUT /api/user
pub async fn handle_update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserProfile>, AppError> {
    validate_update(&req)?;

    let user: UserRow = sqlx::query_as(
        r#"
        UPDATE users SET
            name = COALESCE($2, name),
            phone_number = COALESCE($3, phone_number),
            date_of_birth = COALESCE($4, date_of_birth),
            gender = COALESCE($5, gender),
            education = COALESCE($6, education),
            occupation = COALESCE($7, occupation),
            profile_picture = COALESCE($8, profile_picture)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(auth.id)
    .bind(&req.name)
    .bind(&req.phone_number)
    .bind(req.date_of_birth)
    .bind(&req.gender)
    .bind(&req.education)
    .bind(&req.occupation)
    .bind(&req.profile_picture)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UserProfile::from(&user)))
}

/// GET /api/user/activity
pub async fn handle_get_activity(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserActivity>, AppError> {
    let user: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(auth.id)
        .fetch_one(&state.db)
        .await?;
    Ok(Json(fetch_activity(&state, &user).await?))
}

async fn fetch_activity(state: &AppState, user: &UserRow) -> Result<UserActivity, AppError> {
    let assessments: Vec<AssessmentSummaryRow> = sqlx::query_as(
        r#"
        SELECT id, technology, level, score, submitted, created_at, result
        FROM assessments
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(UserActivity {
        last_login: user.last_login,
        assessments,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_signup(req: &SignupRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if !looks_like_email(&req.email) {
        return Err(AppError::Validation(
            "Please include a valid email".to_string(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Please enter a password with {MIN_PASSWORD_LEN} or more characters"
        )));
    }
    if req.phone_number.trim().is_empty() {
        return Err(AppError::Validation("Phone number is required".to_string()));
    }
    if !GENDERS.contains(&req.gender.as_str()) {
        return Err(AppError::Validation("Gender is required".to_string()));
    }
    if !EDUCATION_LEVELS.contains(&req.education.as_str()) {
        return Err(AppError::Validation("Education is required".to_string()));
    }
    if req.occupation.trim().is_empty() {
        return Err(AppError::Validation("Occupation is required".to_string()));
    }
    Ok(())
}

fn validate_update(req: &UpdateUserRequest) -> Result<(), AppError> {
    if matches!(&req.name, Some(n) if n.trim().is_empty()) {
        return Err(AppError::Validation("Name must not be empty".to_string()));
    }
    if matches!(&req.phone_number, Some(p) if p.trim().is_empty()) {
        return Err(AppError::Validation(
            "Phone number must not be empty".to_string(),
        ));
    }
    if matches!(&req.gender, Some(g) if !GENDERS.contains(&g.as_str())) {
        return Err(AppError::Validation("Invalid gender".to_string()));
    }
    if matches!(&req.education, Some(e) if !EDUCATION_LEVELS.contains(&e.as_str())) {
        return Err(AppError::Validation("Invalid education".to_string()));
    }
    if matches!(&req.occupation, Some(o) if o.trim().is_empty()) {
        return Err(AppError::Validation(
            "Occupation must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_signup() -> SignupRequest {
        SignupRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter22".to_string(),
            phone_number: "+1-555-0100".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            gender: "female".to_string(),
            education: "masters".to_string(),
            occupation: "Engineer".to_string(),
        }
    }

    #[test]
    fn test_valid_signup_passes() {
        assert!(validate_signup(&valid_signup()).is_ok());
    }

    #[test]
    fn test_short_password_rejected() {
        let mut req = valid_signup();
        req.password = "abc".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut req = valid_signup();
        req.email = "not-an-email".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let mut req = valid_signup();
        req.gender = "robot".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn test_email_shapes() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@.co."));
    }

    #[test]
    fn test_partial_update_allows_missing_fields() {
        let req = UpdateUserRequest {
            name: Some("Grace".to_string()),
            phone_number: None,
            date_of_birth: None,
            gender: None,
            education: None,
            occupation: None,
            profile_picture: None,
        };
        assert!(validate_update(&req).is_ok());
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let req = UpdateUserRequest {
            name: Some("  ".to_string()),
            phone_number: None,
            date_of_birth: None,
            gender: None,
            education: None,
            occupation: None,
            profile_picture: None,
        };
        assert!(validate_update(&req).is_err());
    }
}
