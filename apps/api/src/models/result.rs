use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::lenient;
use crate::models::profile::Contact;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub skill: String,
    /// "familiar" | "working" | "strong" when the model provides one.
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub short_desc: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub tech: Vec<String>,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub bullets: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub dates: String,
    #[serde(default, deserialize_with = "lenient::strings")]
    pub bullets: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub school: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub year: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The resume document returned to clients as `json_output`.
///
/// Every list is always present, possibly empty. Top-level fields the model
/// produced outside this shape are kept in `extra` and serialized alongside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub name: String,
    pub contact: Contact,
    pub summary: String,
    pub skills: Vec<SkillEntry>,
    pub projects: Vec<ProjectEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub is_fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_result_serializes_every_list() {
        let value = serde_json::to_value(GenerationResult::default()).unwrap();
        for field in ["skills", "projects", "experience", "education"] {
            assert!(value[field].is_array(), "{field} must serialize as an array");
        }
        assert_eq!(value["is_fallback"], false);
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_project_entry_accepts_string_tech() {
        let project: ProjectEntry = serde_json::from_value(json!({
            "name": "payments-api",
            "short_desc": "Payment rails",
            "tech": "Go",
            "bullets": null,
            "stars": 10
        }))
        .unwrap();
        assert_eq!(project.short_desc, "Payment rails");
        assert_eq!(project.tech, vec!["Go"]);
        assert!(project.bullets.is_empty());
        assert_eq!(project.extra["stars"], 10);
    }

    #[test]
    fn test_education_year_as_number() {
        let edu: EducationEntry =
            serde_json::from_value(json!({"degree": "BSc", "school": "MIT", "year": 2019}))
                .unwrap();
        assert_eq!(edu.year, "2019");
    }

    #[test]
    fn test_skill_level_is_skipped_when_absent() {
        let skill = SkillEntry {
            skill: "Rust".to_string(),
            description: "Systems work".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&skill).unwrap();
        assert!(value.get("level").is_none());
    }

    #[test]
    fn test_extra_fields_flatten_into_output() {
        let mut result = GenerationResult::default();
        result
            .extra
            .insert("certifications".to_string(), json!(["CKA"]));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["certifications"], json!(["CKA"]));
    }
}
