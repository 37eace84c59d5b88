//! Prompt construction for training course outline generation.

pub fn build_course_prompt(
    job_description: &str,
    technology_stack: &str,
    duration_weeks: u32,
    training_level: &str,
) -> String {
    format!(
        "Generate a detailed training course outline based on the following information:
- Job Description: {job_description}
- Technology Stack: {technology_stack}
- Duration: {duration_weeks} weeks
- Training Level: {training_level}

The course outline should include:
- Course Title
- Course Overview
- Learning Objectives (as an array)
- Technologies Covered (as an array)
- Weekly breakdown (for each week):
  - Daily topics (for 5 days each week)
  - Daily activities (for each day)
  - Daily learning outcomes (for each day)

The training occurs 5 days a week, 4 hours each day.
Format the response as a JSON object with the following structure:
{{
  \"courseTitle\": \"string\",
  \"courseOverview\": \"string\",
  \"learningObjectives\": [\"string\"],
  \"technologiesCovered\": [\"string\"],
  \"weeklyBreakdown\": [
    {{
      \"week\": number,
      \"dailyTopics\": [
        {{
          \"day\": number,
          \"topics\": [\"string\"],
          \"activities\": [\"string\"],
          \"learningOutcomes\": [\"string\"]
        }}
      ]
    }}
  ]
}}
Respond with the JSON object only."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_carries_request_fields() {
        let prompt = build_course_prompt("Backend engineer", "Rust, Postgres", 6, "Beginner");
        assert!(prompt.contains("Backend engineer"));
        assert!(prompt.contains("Rust, Postgres"));
        assert!(prompt.contains("6 weeks"));
        assert!(prompt.contains("Beginner"));
    }

    #[test]
    fn test_prompt_describes_expected_schema() {
        let prompt = build_course_prompt("x", "y", 1, "z");
        for key in ["courseTitle", "courseOverview", "weeklyBreakdown"] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }
}
