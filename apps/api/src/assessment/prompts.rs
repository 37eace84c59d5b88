//! Prompt construction for assessment question generation.

pub const QUESTION_COUNT: usize = 25;

/// Builds the generation prompt for a technology/level pair. The competency
/// list is the predeclared set for the technology (or the generic fallback).
pub fn build_question_prompt(technology: &str, level: &str, competencies: &[&str]) -> String {
    format!(
        "Generate {QUESTION_COUNT} multiple-choice questions for a {level} level {technology} \
interview. Focus on the core technology.
The questions should be appropriate for a {level} (Beginner, Mid-Level, or Senior-Executive) \
and be divided into Bloom's Taxonomy categories: Remember, Understand, Apply, Analyze, and \
Create. Make sure all the questions have 4 options. Include relevant coding & debugging \
questions. If the question is related to coding then have 4 sample codes given in the options \
to select from, make sure one of the options is correct and the question doesn't have the \
listed options.

Make the questions scenario-based rather than having direct answers, use explicitly any one \
of the Bloom's taxonomy categories: Remember, Understand, Apply, Analyze, Create, Evaluate. \
There should be at least one question in each of the Bloom's taxonomy categories.

For each question, assign one of the following competencies:
{competency_list}

Format the response as a JSON array of objects, each containing:
id, text, options (array of 4 choices), correctAnswer (choice number between 1-4), \
difficulty (easy, medium, hard), bloomsCategory, and competency. \
Respond with the JSON array only.",
        competency_list = competencies.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::competencies::competencies_for;

    #[test]
    fn test_prompt_names_every_competency() {
        let competencies = competencies_for("Python").unwrap();
        let prompt = build_question_prompt("Python", "Beginner", competencies);
        for competency in competencies {
            assert!(prompt.contains(competency), "missing {competency}");
        }
    }

    #[test]
    fn test_prompt_carries_level_and_technology() {
        let prompt = build_question_prompt("SRE", "Senior-Executive", &["Automation"]);
        assert!(prompt.contains("SRE"));
        assert!(prompt.contains("Senior-Executive"));
    }
}
