//! Normalization of provider-generated questions.
//!
//! The provider is asked for `correctAnswer` as a choice number 1..4; storage
//! uses a 0-based option index. Malformed questions fail the whole batch so a
//! bad generation never becomes a half-broken assessment.

use crate::models::assessment::Question;

pub const OPTIONS_PER_QUESTION: usize = 4;

/// Validates a generated batch and converts each `correct_answer` from the
/// provider's 1-based choice number to a 0-based index.
pub fn normalize_generated(questions: Vec<Question>) -> Result<Vec<Question>, String> {
    if questions.is_empty() {
        return Err("Provider returned no questions".to_string());
    }
    questions
        .into_iter()
        .map(|mut q| {
            if q.text.trim().is_empty() {
                return Err(format!("Question {} has empty text", q.id));
            }
            if q.options.len() != OPTIONS_PER_QUESTION {
                return Err(format!(
                    "Question {} has {} options, expected {OPTIONS_PER_QUESTION}",
                    q.id,
                    q.options.len()
                ));
            }
            if !(1..=OPTIONS_PER_QUESTION as i32).contains(&q.correct_answer) {
                return Err(format!(
                    "Question {} has out-of-range correctAnswer {}",
                    q.id, q.correct_answer
                ));
            }
            q.correct_answer -= 1;
            Ok(q)
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn make_question(
    id: &str,
    correct_answer: i32,
    blooms_category: Option<&str>,
    competency: Option<&str>,
) -> Question {
    Question {
        id: id.to_string(),
        text: format!("Question {id}?"),
        options: vec![
            "A".to_string(),
            "B".to_string(),
            "C".to_string(),
            "D".to_string(),
        ],
        correct_answer,
        difficulty: Some("medium".to_string()),
        blooms_category: blooms_category.map(str::to_string),
        competency: competency.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_becomes_zero_based() {
        let batch = vec![
            make_question("q1", 1, Some("Remember"), Some("Core Java")),
            make_question("q2", 4, Some("Apply"), Some("Core Java")),
        ];
        let normalized = normalize_generated(batch).unwrap();
        assert_eq!(normalized[0].correct_answer, 0);
        assert_eq!(normalized[1].correct_answer, 3);
    }

    #[test]
    fn test_zero_correct_answer_rejected() {
        let batch = vec![make_question("q1", 0, None, None)];
        assert!(normalize_generated(batch).is_err());
    }

    #[test]
    fn test_correct_answer_above_four_rejected() {
        let batch = vec![make_question("q1", 5, None, None)];
        assert!(normalize_generated(batch).is_err());
    }

    #[test]
    fn test_wrong_option_count_rejected() {
        let mut q = make_question("q1", 2, None, None);
        q.options.pop();
        assert!(normalize_generated(vec![q]).is_err());
    }

    #[test]
    fn test_empty_batch_rejected() {
        assert!(normalize_generated(Vec::new()).is_err());
    }

    #[test]
    fn test_one_bad_question_fails_the_batch() {
        let batch = vec![
            make_question("q1", 1, None, None),
            make_question("q2", 9, None, None),
        ];
        assert!(normalize_generated(batch).is_err());
    }
}
