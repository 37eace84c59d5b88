//! Grading and chart aggregation.
//!
//! A submission is graded in a single pass over the question list, producing
//! the raw score plus two independent breakdowns: per Bloom's-taxonomy
//! category (bar chart) and per technology competency (radar chart).
//!
//! Competency policy: a question whose `competency` is missing or not in the
//! technology's predeclared set is skipped before grading. It cannot add to
//! the score or to either aggregate, but it still counts in the
//! `questions.len()` denominator, so it effectively grades as incorrect.

use tracing::warn;

use crate::models::assessment::{
    AssessmentResult, CategoryBreakdown, CompetencyScore, Question,
};

use super::competencies::BLOOMS_TAXONOMY;

/// Sentinel for an unanswered question. Never equals a valid 0-based index.
pub const NO_ANSWER: i32 = -1;

/// Fraction of correct answers required for `selected`.
pub const SELECTION_CUTOFF: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub score: u32,
    pub percentage_score: f64,
    pub result: AssessmentResult,
}

/// Converts client answers (1-based choice numbers, `None`/0 for unanswered)
/// into 0-based indices with `NO_ANSWER` sentinels, padded or truncated to
/// the question count.
pub fn normalize_answers(raw: &[Option<u8>], question_count: usize) -> Vec<i32> {
    (0..question_count)
        .map(|i| match raw.get(i).copied().flatten() {
            Some(choice @ 1..=4) => i32::from(choice) - 1,
            _ => NO_ANSWER,
        })
        .collect()
}

/// Grades a normalized submission against the question list.
///
/// `declared_competencies` is the ordered competency set predeclared for the
/// assessment's technology; the radar chart has one row per entry even when
/// no question was tagged with it.
pub fn score_submission(
    questions: &[Question],
    answers: &[i32],
    declared_competencies: &[&str],
) -> Scored {
    debug_assert_eq!(questions.len(), answers.len());

    let mut score: u32 = 0;
    // (correct, total) per declared competency, in declared order.
    let mut competency_counts = vec![(0u32, 0u32); declared_competencies.len()];
    // (category, correct, total) per Bloom's category, in first-seen order.
    let mut bloom_counts: Vec<(String, u32, u32)> = Vec::new();

    for (i, question) in questions.iter().enumerate() {
        let Some(competency) = question.competency.as_deref() else {
            warn!("Missing competency for question: {}", question.id);
            continue;
        };
        let Some(slot) = declared_competencies.iter().position(|c| *c == competency) else {
            warn!(
                "Invalid competency for question: {}. Competency: {competency}",
                question.id
            );
            continue;
        };

        competency_counts[slot].1 += 1;
        let correct = answers[i] == question.correct_answer;
        if correct {
            score += 1;
            competency_counts[slot].0 += 1;
        }

        if let Some(category) = question.blooms_category.as_deref() {
            let idx = match bloom_counts.iter().position(|(c, _, _)| c == category) {
                Some(idx) => idx,
                None => {
                    bloom_counts.push((category.to_string(), 0, 0));
                    bloom_counts.len() - 1
                }
            };
            bloom_counts[idx].2 += 1;
            if correct {
                bloom_counts[idx].1 += 1;
            }
        }
    }

    // Emit bar rows in canonical taxonomy order; anything outside the taxonomy
    // (malformed provider output) trails in first-seen order.
    bloom_counts.sort_by_key(|(category, _, _)| {
        BLOOMS_TAXONOMY
            .iter()
            .position(|c| c == category)
            .unwrap_or(BLOOMS_TAXONOMY.len())
    });
    let bar_chart_data = bloom_counts
        .into_iter()
        .map(|(category, correct, total)| CategoryBreakdown {
            category,
            correct,
            total,
        })
        .collect();

    let spider_chart_data = declared_competencies
        .iter()
        .zip(&competency_counts)
        .map(|(competency, &(correct, total))| CompetencyScore {
            competency: competency.to_string(),
            // A competency no question was tagged with scores 0, not NaN.
            score: if total > 0 {
                f64::from(correct) / f64::from(total)
            } else {
                0.0
            },
            total,
        })
        .collect();

    let percentage_score = if questions.is_empty() {
        0.0
    } else {
        100.0 * f64::from(score) / questions.len() as f64
    };

    Scored {
        score,
        percentage_score,
        result: AssessmentResult {
            bar_chart_data,
            spider_chart_data,
            selected: percentage_score >= SELECTION_CUTOFF * 100.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::questions::make_question;

    const COMPETENCIES: [&str; 3] = ["Core Java", "Spring Framework", "RESTful APIs"];

    /// Batch where question `i` stores option index `i % 4` as correct.
    fn question_batch(n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| {
                make_question(
                    &format!("q{i}"),
                    (i % 4) as i32,
                    Some(BLOOMS_TAXONOMY[i % BLOOMS_TAXONOMY.len()]),
                    Some(COMPETENCIES[i % COMPETENCIES.len()]),
                )
            })
            .collect()
    }

    fn all_correct_answers(questions: &[Question]) -> Vec<i32> {
        questions.iter().map(|q| q.correct_answer).collect()
    }

    #[test]
    fn test_normalize_one_based_to_zero_based() {
        let raw = vec![Some(1), Some(4), None, Some(2)];
        assert_eq!(normalize_answers(&raw, 4), vec![0, 3, NO_ANSWER, 1]);
    }

    #[test]
    fn test_normalize_zero_choice_is_unanswered() {
        // The wire format allows 0 as an explicit "no answer".
        assert_eq!(normalize_answers(&[Some(0)], 1), vec![NO_ANSWER]);
    }

    #[test]
    fn test_normalize_pads_missing_entries() {
        assert_eq!(
            normalize_answers(&[Some(3)], 3),
            vec![2, NO_ANSWER, NO_ANSWER]
        );
    }

    #[test]
    fn test_normalize_truncates_excess_entries() {
        assert_eq!(normalize_answers(&[Some(1), Some(2), Some(3)], 2), vec![0, 1]);
    }

    #[test]
    fn test_score_bounded_by_question_count() {
        let questions = question_batch(10);
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        assert_eq!(scored.score, 10);
        assert!(scored.score as usize <= questions.len());
    }

    #[test]
    fn test_all_unanswered_scores_zero() {
        let questions = question_batch(5);
        let answers = vec![NO_ANSWER; 5];
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        assert_eq!(scored.score, 0);
        assert!(!scored.result.selected);
    }

    #[test]
    fn test_exactly_eighty_percent_is_selected() {
        // 25 questions, 20 correct: percentage 80, selected true.
        let questions = question_batch(25);
        let mut answers = all_correct_answers(&questions);
        for slot in answers.iter_mut().take(5) {
            *slot = NO_ANSWER;
        }
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        assert_eq!(scored.score, 20);
        assert_eq!(scored.percentage_score, 80.0);
        assert!(scored.result.selected);
    }

    #[test]
    fn test_below_eighty_percent_not_selected() {
        let questions = question_batch(25);
        let mut answers = all_correct_answers(&questions);
        for slot in answers.iter_mut().take(6) {
            *slot = NO_ANSWER;
        }
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        assert_eq!(scored.score, 19);
        assert!(!scored.result.selected);
    }

    #[test]
    fn test_competency_totals_equal_graded_questions() {
        let mut questions = question_batch(9);
        questions.push(make_question("bad", 0, Some("Apply"), Some("Nonexistent")));
        questions.push(make_question("none", 0, Some("Apply"), None));
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);

        // 9 of the 11 questions carry a declared competency; the two skipped
        // ones appear in neither aggregate.
        let spider_total: u32 = scored.result.spider_chart_data.iter().map(|c| c.total).sum();
        assert_eq!(spider_total, 9);
        let bar_total: u32 = scored.result.bar_chart_data.iter().map(|b| b.total).sum();
        assert_eq!(bar_total, 9);
    }

    #[test]
    fn test_invalid_competency_excluded_but_in_denominator() {
        let mut questions = question_batch(4);
        questions.push(make_question("bad", 0, Some("Apply"), Some("Nonexistent")));
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);

        // The skipped question is graded as incorrect: 4/5 correct.
        assert_eq!(scored.score, 4);
        assert_eq!(scored.percentage_score, 80.0);
        assert!(scored
            .result
            .spider_chart_data
            .iter()
            .all(|c| c.competency != "Nonexistent"));
    }

    #[test]
    fn test_empty_competency_never_nan() {
        let questions = vec![make_question("q0", 0, Some("Remember"), Some("Core Java"))];
        let scored = score_submission(&questions, &[0], &COMPETENCIES);

        let spring = scored
            .result
            .spider_chart_data
            .iter()
            .find(|c| c.competency == "Spring Framework")
            .unwrap();
        assert_eq!(spring.score, 0.0);
        assert!(!spring.score.is_nan());
    }

    #[test]
    fn test_spider_rows_follow_declared_order() {
        let questions = question_batch(6);
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        let order: Vec<_> = scored
            .result
            .spider_chart_data
            .iter()
            .map(|c| c.competency.as_str())
            .collect();
        assert_eq!(order, COMPETENCIES);
    }

    #[test]
    fn test_bar_rows_follow_taxonomy_order() {
        // Build questions whose categories appear in scrambled order.
        let questions = vec![
            make_question("q0", 0, Some("Create"), Some("Core Java")),
            make_question("q1", 1, Some("Remember"), Some("Core Java")),
            make_question("q2", 2, Some("Apply"), Some("Core Java")),
        ];
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        let order: Vec<_> = scored
            .result
            .bar_chart_data
            .iter()
            .map(|b| b.category.as_str())
            .collect();
        assert_eq!(order, vec!["Remember", "Apply", "Create"]);
    }

    #[test]
    fn test_bar_correct_never_exceeds_total() {
        let questions = question_batch(12);
        let answers = all_correct_answers(&questions);
        let scored = score_submission(&questions, &answers, &COMPETENCIES);
        for row in &scored.result.bar_chart_data {
            assert!(row.correct <= row.total, "{row:?}");
        }
    }

    #[test]
    fn test_no_questions_yields_zero_percentage() {
        let scored = score_submission(&[], &[], &COMPETENCIES);
        assert_eq!(scored.percentage_score, 0.0);
        assert!(!scored.result.selected);
        assert!(!scored.percentage_score.is_nan());
    }

    #[test]
    fn test_wrong_answer_counts_toward_totals_only() {
        let questions = vec![make_question("q0", 0, Some("Remember"), Some("Core Java"))];
        let scored = score_submission(&questions, &[3], &COMPETENCIES);
        assert_eq!(scored.score, 0);
        let core = &scored.result.spider_chart_data[0];
        assert_eq!(core.competency, "Core Java");
        assert_eq!(core.score, 0.0);
        assert_eq!(scored.result.bar_chart_data[0].total, 1);
        assert_eq!(scored.result.bar_chart_data[0].correct, 0);
    }
}
