//! Prompt construction for resume analysis.

pub fn build_analysis_prompt(resume_text: &str) -> String {
    format!(
        "Analyze the following resume and produce a structured assessment of the candidate.

Resume text:
{resume_text}

Format the response as a JSON object with exactly this structure:
{{
  \"summary\": {{ \"candidateName\": \"string\", \"professionalSummary\": \"string\" }},
  \"skills\": {{ \"technical\": [\"string\"], \"nonTechnical\": [\"string\"], \"certifications\": [\"string\"] }},
  \"workExperience\": [{{ \"company\": \"string\", \"position\": \"string\", \"duration\": \"string\", \"responsibilities\": [\"string\"], \"achievements\": [\"string\"] }}],
  \"education\": [{{ \"degree\": \"string\", \"field\": \"string\", \"institution\": \"string\", \"year\": number, \"achievements\": [\"string\"] }}],
  \"projects\": [{{ \"name\": \"string\", \"description\": \"string\", \"technologies\": [\"string\"], \"highlights\": [\"string\"] }}],
  \"strengths\": [\"string\"],
  \"overallCompetencies\": {{
    \"technical\": [{{ \"skill\": \"string\", \"proficiencyLevel\": \"Expert|Intermediate|Beginner\" }}],
    \"nonTechnical\": [{{ \"skill\": \"string\", \"proficiencyLevel\": \"Expert|Intermediate|Beginner\" }}]
  }},
  \"top4Skills\": [{{ \"skill\": \"string\", \"proficiencyLevel\": \"string\" }}],
  \"matchScore\": {{ \"skillsAlignment\": number, \"projectAlignment\": number, \"overallScore\": number }},
  \"futureRoleSuggestions\": [{{ \"role\": \"string\", \"reason\": \"string\", \"requiredSkills\": [\"string\"], \"skillGaps\": [\"string\"] }}]
}}

Base every claim on the resume text; do not invent employers, dates, or degrees. \
Scores are numbers from 0 to 100. top4Skills holds the candidate's four strongest skills. \
Respond with the JSON object only."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_resume_text() {
        let prompt = build_analysis_prompt("Jane Doe, staff engineer at Initech");
        assert!(prompt.contains("Jane Doe, staff engineer at Initech"));
    }

    #[test]
    fn test_prompt_describes_expected_schema() {
        let prompt = build_analysis_prompt("x");
        for key in [
            "candidateName",
            "workExperience",
            "overallCompetencies",
            "top4Skills",
            "matchScore",
            "futureRoleSuggestions",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }
}
