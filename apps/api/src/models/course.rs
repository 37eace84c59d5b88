use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequestRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_description: String,
    pub technology_stack: String,
    pub duration_weeks: i32,
    pub training_level: String,
    pub generated_course_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCourseRow {
    pub id: Uuid,
    pub course_request_id: Uuid,
    pub user_id: Uuid,
    pub outline: Value,
    pub created_at: DateTime<Utc>,
}

/// Provider-shaped course outline, validated before persisting as JSONB.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseOutline {
    pub course_title: String,
    pub course_overview: String,
    #[serde(default)]
    pub learning_objectives: Vec<String>,
    #[serde(default)]
    pub technologies_covered: Vec<String>,
    #[serde(default)]
    pub weekly_breakdown: Vec<WeekPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    pub week: u32,
    #[serde(default)]
    pub daily_topics: Vec<DayPlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub day: u32,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
}
