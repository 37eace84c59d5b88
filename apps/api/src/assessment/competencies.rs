//! Predeclared classification axes.
//!
//! Aggregation output ordering follows these lists, declared up front per
//! technology, rather than whatever order the provider happened to emit.

/// Bloom's taxonomy in canonical order. Bar-chart rows follow this order.
pub const BLOOMS_TAXONOMY: [&str; 6] = [
    "Remember",
    "Understand",
    "Apply",
    "Analyze",
    "Evaluate",
    "Create",
];

pub const TECHNOLOGIES: [&str; 5] = ["Java Full Stack", "Python", "Dev-Ops", "SRE", "AI"];

pub const LEVELS: [&str; 3] = ["Beginner", "Mid-Level", "Senior-Executive"];

/// Competency list used in generation prompts when the technology has no
/// predeclared set.
pub const FALLBACK_COMPETENCIES: [&str; 6] = [
    "General Knowledge",
    "Problem Solving",
    "Coding Skills",
    "System Design",
    "Best Practices",
    "Tool Proficiency",
];

/// Returns the ordered competency set for a known technology.
pub fn competencies_for(technology: &str) -> Option<&'static [&'static str]> {
    match technology {
        "Java Full Stack" => Some(&[
            "Core Java",
            "Advanced Java",
            "Spring Framework",
            "RESTful APIs",
            "Database Management",
            "Web Development",
        ]),
        "Python" => Some(&[
            "Core Python",
            "Data Structures",
            "Web Frameworks",
            "Data Analysis",
            "Machine Learning",
            "API Development",
        ]),
        "Dev-Ops" => Some(&[
            "CI/CD",
            "Containerization",
            "Cloud Platforms",
            "Infrastructure as Code",
            "Monitoring and Logging",
            "Security",
        ]),
        "SRE" => Some(&[
            "System Design",
            "Reliability Engineering",
            "Performance Optimization",
            "Incident Management",
            "Automation",
            "Capacity Planning",
        ]),
        "AI" => Some(&[
            "Machine Learning",
            "Deep Learning",
            "Natural Language Processing",
            "Computer Vision",
            "Data Preprocessing",
            "Model Deployment",
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_technology_has_competencies() {
        for tech in TECHNOLOGIES {
            let set = competencies_for(tech).unwrap();
            assert_eq!(set.len(), 6, "{tech} should declare 6 competencies");
        }
    }

    #[test]
    fn test_unknown_technology_has_none() {
        assert!(competencies_for("COBOL").is_none());
    }

    #[test]
    fn test_no_duplicate_competencies_within_a_set() {
        for tech in TECHNOLOGIES {
            let set = competencies_for(tech).unwrap();
            let mut sorted: Vec<_> = set.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), set.len(), "{tech} has duplicates");
        }
    }
}
