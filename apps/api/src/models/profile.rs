use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::lenient;

/// Candidate contact details. Unknown keys (phone, links, ...) are carried through.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_empty() && self.location.is_empty() && self.extra.is_empty()
    }
}

/// Everything known about the candidate for one generation call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CandidateProfile {
    pub name: String,
    pub contact: Contact,
    pub resume_text: String,
    pub detected_languages: Vec<String>,
    pub target_role: String,
    pub tone: String,
    /// Total repositories the user owns; may exceed the number supplied in the request.
    pub repo_count: u64,
}

/// A repository as supplied by the caller (originally sourced from the repository host).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: String,
    pub language: String,
    pub stars: u64,
    pub forks: u64,
    pub topics: Vec<String>,
    pub url: String,
    /// Secondary ranking signal (commit/activity count).
    pub commits: u64,
    pub owner: String,
    pub tech: Vec<String>,
    pub readme_snippet: String,
}

impl RepositorySummary {
    /// Explicit tech list, or the primary language followed by topics.
    pub fn tech_stack(&self) -> Vec<String> {
        if !self.tech.is_empty() {
            return self.tech.clone();
        }
        std::iter::once(self.language.clone())
            .chain(self.topics.iter().cloned())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contact_tolerates_wrong_types_and_keeps_extras() {
        let contact: Contact = serde_json::from_value(json!({
            "email": null,
            "location": "Remote",
            "phone": "+1 555 0100"
        }))
        .unwrap();
        assert_eq!(contact.email, "");
        assert_eq!(contact.location, "Remote");
        assert_eq!(contact.extra["phone"], "+1 555 0100");
        assert!(!contact.is_empty());
    }

    #[test]
    fn test_default_contact_is_empty() {
        assert!(Contact::default().is_empty());
    }

    #[test]
    fn test_tech_stack_falls_back_to_language_and_topics() {
        let repo = RepositorySummary {
            name: "svc".to_string(),
            language: "Go".to_string(),
            topics: vec!["grpc".to_string()],
            ..Default::default()
        };
        assert_eq!(repo.tech_stack(), vec!["Go", "grpc"]);
    }

    #[test]
    fn test_explicit_tech_wins() {
        let repo = RepositorySummary {
            language: "Go".to_string(),
            tech: vec!["Go".to_string(), "Postgres".to_string()],
            ..Default::default()
        };
        assert_eq!(repo.tech_stack(), vec!["Go", "Postgres"]);
    }
}
