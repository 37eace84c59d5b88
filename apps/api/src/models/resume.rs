use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of an uploaded resume file.
pub mod status {
    pub const UPLOADED: &str = "uploaded";
    pub const ANALYZED: &str = "analyzed";
    pub const FAILED: &str = "failed";
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub s3_key: String,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Uuid,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub resume_text: String,
    pub analysis: Value,
    pub analyzed_at: DateTime<Utc>,
}

// Provider-shaped analysis document. Deserialized from model output to
// validate structure before the row is written; lenient on optional sections.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysisDoc {
    pub summary: AnalysisSummary,
    pub skills: SkillSet,
    #[serde(default)]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default)]
    pub education: Vec<EducationRecord>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub strengths: Vec<String>,
    pub overall_competencies: OverallCompetencies,
    #[serde(default)]
    pub top4_skills: Vec<RatedSkill>,
    pub match_score: MatchScore,
    #[serde(default)]
    pub future_role_suggestions: Vec<RoleSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub candidate_name: String,
    pub professional_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSet {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub non_technical: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    pub institution: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallCompetencies {
    #[serde(default)]
    pub technical: Vec<RatedSkill>,
    #[serde(default)]
    pub non_technical: Vec<RatedSkill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedSkill {
    pub skill: String,
    pub proficiency_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScore {
    pub skills_alignment: f64,
    pub project_alignment: f64,
    pub overall_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleSuggestion {
    pub role: String,
    pub reason: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
}
