//! Bearer-token authentication.
//!
//! `AuthUser` is a request extractor: it validates the `Authorization: Bearer`
//! header, checks the token signature and expiry, and confirms the user still
//! exists. Handlers take it as an argument to mark a route as protected.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

pub mod handlers;
pub mod password;
pub mod token;

/// The authenticated caller, resolved against the users table on every request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub public_id: String,
    pub name: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let bearer = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims =
            token::verify(&state.config.jwt_secret, bearer).map_err(|_| AppError::Unauthorized)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

        // The token may outlive the account; confirm the user still exists.
        let row: Option<(Uuid, String, String)> =
            sqlx::query_as("SELECT id, public_id, name FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&state.db)
                .await?;

        let (id, public_id, name) = row.ok_or(AppError::Unauthorized)?;
        Ok(AuthUser {
            id,
            public_id,
            name,
        })
    }
}
