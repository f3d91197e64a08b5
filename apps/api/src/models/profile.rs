//! Structured shapes the LLM backends are asked to produce.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Query used when extracted criteria carry no usable one.
pub const DEFAULT_SEARCH_QUERY: &str = "Software Engineer jobs";
pub const MAX_TOP_SKILLS: usize = 5;

/// Structured resume profile. All fields are optional so partial extractions
/// still deserialize. Year counts are kept as returned (`7`, `"5+"`, `"2-3"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub summary: Option<String>,
    pub years_of_experience: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: Option<String>,
    pub company: Option<String>,
    pub years: Option<Value>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub school: Option<String>,
    /// Models return both `2019` and `"2019"`; kept as-is.
    pub year: Option<Value>,
}

/// Seniority bucket. Spelling variants are folded on input; anything
/// unrecognised becomes `Unknown` instead of failing the whole reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ExperienceLevel {
    Intern,
    Junior,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    Senior,
    Lead,
    #[default]
    Unknown,
}

impl ExperienceLevel {
    /// Case, spaces, hyphens and underscores are ignored.
    pub fn parse_lenient(raw: &str) -> Self {
        let folded: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "intern" | "internship" => ExperienceLevel::Intern,
            "junior" | "jr" | "entry" | "entrylevel" => ExperienceLevel::Junior,
            "mid" | "midlevel" | "intermediate" => ExperienceLevel::MidLevel,
            "senior" | "sr" => ExperienceLevel::Senior,
            "lead" => ExperienceLevel::Lead,
            _ => ExperienceLevel::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(ExperienceLevel::parse_lenient)
            .unwrap_or_default())
    }
}

/// Job search criteria derived from a resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub top_skills: Vec<String>,
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchCriteria {
    /// Caps `top_skills` and drops blank entries.
    pub fn normalized(mut self) -> Self {
        self.top_skills.retain(|s| !s.trim().is_empty());
        self.top_skills.truncate(MAX_TOP_SKILLS);
        self
    }

    /// The query to search with, falling back to [`DEFAULT_SEARCH_QUERY`].
    pub fn effective_query(&self) -> &str {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .unwrap_or(DEFAULT_SEARCH_QUERY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mid_level_serde() {
        let level: ExperienceLevel = serde_json::from_str(r#""Mid-Level""#).unwrap();
        assert_eq!(level, ExperienceLevel::MidLevel);
        let level: ExperienceLevel = serde_json::from_str(r#""Mid-level""#).unwrap();
        assert_eq!(level, ExperienceLevel::MidLevel);
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::MidLevel).unwrap(),
            r#""Mid-Level""#
        );
    }

    #[test]
    fn test_level_spelling_variants() {
        for raw in [r#""Mid Level""#, r#""mid-level""#, r#""MID_LEVEL""#, r#""Mid""#] {
            let level: ExperienceLevel = serde_json::from_str(raw).unwrap();
            assert_eq!(level, ExperienceLevel::MidLevel, "{raw}");
        }
        let level: ExperienceLevel = serde_json::from_str(r#""senior""#).unwrap();
        assert_eq!(level, ExperienceLevel::Senior);
    }

    #[test]
    fn test_unrecognised_level_becomes_unknown() {
        let level: ExperienceLevel = serde_json::from_str(r#""Principal""#).unwrap();
        assert_eq!(level, ExperienceLevel::Unknown);
        let level: ExperienceLevel = serde_json::from_str("null").unwrap();
        assert_eq!(level, ExperienceLevel::Unknown);
        assert!(serde_json::from_str::<ExperienceLevel>("3").is_err());
    }

    #[test]
    fn test_criteria_without_domain_or_level() {
        let criteria: SearchCriteria =
            serde_json::from_str(r#"{"query": "Rust backend jobs"}"#).unwrap();
        assert_eq!(criteria.experience_level, ExperienceLevel::Unknown);
        assert!(criteria.domain.is_empty());
        assert_eq!(criteria.effective_query(), "Rust backend jobs");
    }

    #[test]
    fn test_missing_query_uses_default() {
        let criteria: SearchCriteria = serde_json::from_str(
            r#"{"experience_level": "Senior", "domain": "Data Scientist", "top_skills": ["python"]}"#,
        )
        .unwrap();
        assert_eq!(criteria.effective_query(), DEFAULT_SEARCH_QUERY);
    }

    #[test]
    fn test_blank_query_uses_default() {
        let criteria = SearchCriteria {
            experience_level: ExperienceLevel::Junior,
            domain: "Frontend Developer".to_string(),
            degree: None,
            top_skills: vec![],
            query: Some("   ".to_string()),
        };
        assert_eq!(criteria.effective_query(), DEFAULT_SEARCH_QUERY);
    }

    #[test]
    fn test_top_skills_capped() {
        let criteria = SearchCriteria {
            experience_level: ExperienceLevel::Lead,
            domain: "DevOps Engineer".to_string(),
            degree: Some("Masters".to_string()),
            top_skills: ["aws", "", "terraform", "k8s", "go", "python", "bash"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            query: Some("Lead DevOps Engineer remote jobs".to_string()),
        }
        .normalized();
        assert_eq!(
            criteria.top_skills,
            vec!["aws", "terraform", "k8s", "go", "python"]
        );
        assert_eq!(criteria.effective_query(), "Lead DevOps Engineer remote jobs");
    }

    #[test]
    fn test_partial_profile_deserializes() {
        let profile: ResumeProfile =
            serde_json::from_str(r#"{"name": "Ada", "skills": ["rust", "sql"]}"#).unwrap();
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.skills.len(), 2);
        assert!(profile.experience.is_empty());
    }

    #[test]
    fn test_profile_keeps_textual_year_counts() {
        let profile: ResumeProfile = serde_json::from_str(
            r#"{"years_of_experience": "5+", "experience": [{"title": "Dev", "years": "2-3"}]}"#,
        )
        .unwrap();
        assert_eq!(profile.years_of_experience, Some(Value::from("5+")));
        assert_eq!(profile.experience[0].years, Some(Value::from("2-3")));
    }

    #[test]
    fn test_profile_with_wrong_types_is_rejected() {
        assert!(serde_json::from_str::<ResumeProfile>(r#"{"skills": "rust, sql"}"#).is_err());
    }
}
