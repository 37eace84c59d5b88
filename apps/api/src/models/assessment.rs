use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A generated multiple-choice question. Provider-shaped (camelCase JSON) and
/// immutable once stored in the assessment row.
///
/// `correct_answer` is held as a 0-based option index. The provider emits a
/// 1-based choice number; ingest normalization converts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: i32,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub blooms_category: Option<String>,
    #[serde(default)]
    pub competency: Option<String>,
}

/// Client-facing view of a question: the correct answer stays server-side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPublic {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub difficulty: Option<String>,
    pub blooms_category: Option<String>,
    pub competency: Option<String>,
}

impl From<&Question> for QuestionPublic {
    fn from(q: &Question) -> Self {
        QuestionPublic {
            id: q.id.clone(),
            text: q.text.clone(),
            options: q.options.clone(),
            difficulty: q.difficulty.clone(),
            blooms_category: q.blooms_category.clone(),
            competency: q.competency.clone(),
        }
    }
}

/// One bar-chart row: per-Bloom's-category breakdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryBreakdown {
    pub category: String,
    pub correct: u32,
    pub total: u32,
}

/// One radar-chart row: per-competency correctness ratio in [0, 1], plus the
/// number of graded questions tagged with the competency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompetencyScore {
    pub competency: String,
    pub score: f64,
    pub total: u32,
}

/// Derived result stored inside the assessment row, never persisted
/// independently.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub bar_chart_data: Vec<CategoryBreakdown>,
    pub spider_chart_data: Vec<CompetencyScore>,
    pub selected: bool,
}

#[derive(Debug, Clone, FromRow)]
pub struct AssessmentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub technology: String,
    pub level: String,
    pub questions: Value,
    /// Answers recorded before submission, 1-based with nulls for unanswered.
    pub draft_answers: Option<Value>,
    /// Graded answers, 0-based with -1 for unanswered. Set exactly once.
    pub user_answers: Option<Vec<i32>>,
    pub score: Option<i32>,
    pub result: Option<Value>,
    pub submitted: bool,
    pub created_at: DateTime<Utc>,
}

impl AssessmentRow {
    pub fn questions(&self) -> Result<Vec<Question>, serde_json::Error> {
        serde_json::from_value(self.questions.clone())
    }

    /// Draft answers as submitted by the client (1-based, `None` = unanswered).
    /// An assessment without any recorded drafts yields all-unanswered.
    pub fn draft_answers(&self, question_count: usize) -> Vec<Option<u8>> {
        self.draft_answers
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_else(|| vec![None; question_count])
    }
}

/// Row shape for assessment listings on the user activity endpoint.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummaryRow {
    pub id: Uuid,
    pub technology: String,
    pub level: String,
    pub score: Option<i32>,
    pub submitted: bool,
    pub created_at: DateTime<Utc>,
    pub result: Option<Value>,
}
