use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Length of the human-readable user identifier exposed in profiles.
pub const PUBLIC_ID_LEN: usize = 8;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub public_id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub education: String,
    pub occupation: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub last_assessment_id: Option<Uuid>,
}

/// Public projection of a user row. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub education: String,
    pub occupation: String,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl From<&UserRow> for UserProfile {
    fn from(row: &UserRow) -> Self {
        UserProfile {
            id: row.id,
            user_id: row.public_id.clone(),
            name: row.name.clone(),
            email: row.email.clone(),
            phone_number: row.phone_number.clone(),
            date_of_birth: row.date_of_birth,
            gender: row.gender.clone(),
            education: row.education.clone(),
            occupation: row.occupation.clone(),
            profile_picture: row.profile_picture.clone(),
            created_at: row.created_at,
            last_login: row.last_login,
        }
    }
}

/// Generates the short alphanumeric identifier shown alongside the UUID.
pub fn generate_public_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(PUBLIC_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_id_length() {
        assert_eq!(generate_public_id().len(), PUBLIC_ID_LEN);
    }

    #[test]
    fn test_public_id_alphanumeric() {
        assert!(generate_public_id().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_public_ids_differ() {
        // Collisions at 62^8 are possible but two consecutive draws matching
        // would indicate a broken RNG.
        assert_ne!(generate_public_id(), generate_public_id());
    }
}
