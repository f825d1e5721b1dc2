//! Request Normalizer: turns a loosely-typed payload into a `CandidateProfile`
//! and a list of `RepositorySummary`, defaulting anything absent or mistyped.
//!
//! Pure functions; the only rejection is a missing `target_role` on the strict path.

use serde_json::{Map, Value};

use crate::errors::{AppError, ValidationIssue};
use crate::models::lenient::{field_count, field_text, value_to_text, value_to_texts};
use crate::models::profile::{CandidateProfile, Contact, RepositorySummary};

/// Normalized body of a resume generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub profile: CandidateProfile,
    pub repositories: Vec<RepositorySummary>,
}

/// Strict-schema entry point for `POST /api/resume/generate`.
pub fn normalize_generation_request(body: &Value) -> Result<GenerationRequest, AppError> {
    let profile = normalize_profile(body);
    validate_profile(&profile)?;

    let repositories = body
        .get("top_repos")
        .map(normalize_repositories)
        .unwrap_or_default();

    Ok(GenerationRequest {
        profile,
        repositories,
    })
}

/// Builds a profile from whatever the payload carries. Never fails.
/// Text fields accept JSON strings only; anything else defaults to empty.
pub fn normalize_profile(body: &Value) -> CandidateProfile {
    let empty = Map::new();
    let obj = body.as_object().unwrap_or(&empty);

    CandidateProfile {
        name: field_text(obj, &["name"]),
        contact: obj
            .get("contact")
            .and_then(Value::as_object)
            .map(normalize_contact)
            .unwrap_or_default(),
        resume_text: obj
            .get("existing_resume_text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        detected_languages: unique(
            obj.get("detected_languages")
                .filter(|v| v.is_array())
                .map(value_to_texts)
                .unwrap_or_default(),
        ),
        target_role: field_text(obj, &["target_role"]),
        tone: field_text(obj, &["tone"]),
        repo_count: field_count(obj, &["repo_count"]),
    }
}

/// `email` and `location` are read as strings; other keys are carried through as given.
fn normalize_contact(obj: &Map<String, Value>) -> Contact {
    let extra = obj
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "email" | "location"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Contact {
        email: field_text(obj, &["email"]),
        location: field_text(obj, &["location"]),
        extra,
    }
}

/// Checks the fields the strict schema requires.
pub fn validate_profile(profile: &CandidateProfile) -> Result<(), AppError> {
    let mut issues = Vec::new();
    if profile.target_role.trim().is_empty() {
        issues.push(ValidationIssue::new(
            "target_role",
            "target_role is required and must be a non-empty string",
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::validation(issues))
    }
}

/// Reads a repository list. A non-array yields an empty list; non-object items are skipped.
pub fn normalize_repositories(value: &Value) -> Vec<RepositorySummary> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(normalize_repository).collect())
        .unwrap_or_default()
}

/// Reads one repository, accepting both the client's shape and the repository host's raw shape.
pub fn normalize_repository(value: &Value) -> Option<RepositorySummary> {
    let obj = value.as_object()?;

    let owner = match obj.get("owner") {
        Some(Value::Object(owner)) => field_text(owner, &["login"]),
        Some(other) => value_to_text(other),
        None => String::new(),
    };

    Some(RepositorySummary {
        name: field_text(obj, &["name"]),
        description: field_text(obj, &["description", "short_desc"]),
        language: field_text(obj, &["language"]),
        stars: field_count(obj, &["stars", "stargazers_count"]),
        forks: field_count(obj, &["forks", "forks_count"]),
        topics: unique(obj.get("topics").map(value_to_texts).unwrap_or_default()),
        url: field_text(obj, &["url", "html_url"]),
        commits: field_count(obj, &["commits", "commit_count"]),
        owner,
        tech: obj.get("tech").map(value_to_texts).unwrap_or_default(),
        readme_snippet: field_text(obj, &["readme_snippet"]),
    })
}

/// Drops repeats, keeping the first occurrence.
fn unique(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_target_role_is_rejected() {
        let err = normalize_generation_request(&json!({"name": "Ada"})).unwrap_err();
        match err {
            AppError::Validation { issues, .. } => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "target_role");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_target_role_is_rejected() {
        let result = normalize_generation_request(&json!({"target_role": "   "}));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_non_string_target_role_is_rejected() {
        for role in [json!(42), json!(true), json!({"x": 1}), json!(["Backend"])] {
            let err = normalize_generation_request(&json!({"target_role": role})).unwrap_err();
            match err {
                AppError::Validation { issues, .. } => assert_eq!(issues[0].field, "target_role"),
                other => panic!("expected validation error for {role}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_mistyped_text_fields_default_to_empty() {
        let profile = normalize_profile(&json!({
            "name": 7,
            "tone": {"style": "bold"},
            "contact": {"email": ["ada@example.com"], "location": false, "phone": "555"},
            "detected_languages": ["Go", 3, null]
        }));
        assert_eq!(profile.name, "");
        assert_eq!(profile.tone, "");
        assert_eq!(profile.contact.email, "");
        assert_eq!(profile.contact.location, "");
        assert_eq!(profile.contact.extra["phone"], "555");
        assert_eq!(profile.detected_languages, vec!["Go"]);

        let repo = normalize_repository(&json!({"name": 12, "language": ["Go"], "stars": "4"})).unwrap();
        assert_eq!(repo.name, "");
        assert_eq!(repo.language, "");
        assert_eq!(repo.stars, 4);
    }

    #[test]
    fn test_non_object_body_is_rejected_on_target_role() {
        let result = normalize_generation_request(&json!([1, 2, 3]));
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_everything_else_defaults() {
        let req = normalize_generation_request(&json!({
            "target_role": "Backend Engineer",
            "contact": "not an object",
            "detected_languages": "Go",
            "top_repos": {"name": "oops"},
            "repo_count": "twelve",
            "existing_resume_text": 42
        }))
        .unwrap();
        assert_eq!(req.profile.target_role, "Backend Engineer");
        assert!(req.profile.contact.is_empty());
        assert!(req.profile.detected_languages.is_empty());
        assert!(req.repositories.is_empty());
        assert_eq!(req.profile.repo_count, 0);
        assert_eq!(req.profile.resume_text, "");
        assert_eq!(req.profile.name, "");
        assert_eq!(req.profile.tone, "");
    }

    #[test]
    fn test_full_payload_is_read() {
        let req = normalize_generation_request(&json!({
            "name": "Ada Lovelace",
            "contact": {"email": "ada@example.com", "location": "Remote"},
            "existing_resume_text": "Engineer at Analytical Engines Ltd.",
            "detected_languages": ["Go", "Python", "Go"],
            "top_repos": [
                {"name": "payments-api", "short_desc": "Payment rails", "stars": 10,
                 "tech": ["Go", "grpc"], "commits": 40, "url": "https://github.com/ada/payments-api",
                 "owner": "ada", "readme_snippet": "# Payments"}
            ],
            "repo_count": 12,
            "target_role": "Backend Engineer",
            "tone": "concise"
        }))
        .unwrap();

        let profile = &req.profile;
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.contact.email, "ada@example.com");
        assert_eq!(profile.detected_languages, vec!["Go", "Python"]);
        assert_eq!(profile.repo_count, 12);
        assert_eq!(profile.tone, "concise");

        let repo = &req.repositories[0];
        assert_eq!(repo.name, "payments-api");
        assert_eq!(repo.description, "Payment rails");
        assert_eq!(repo.stars, 10);
        assert_eq!(repo.commits, 40);
        assert_eq!(repo.tech, vec!["Go", "grpc"]);
        assert_eq!(repo.owner, "ada");
        assert_eq!(repo.readme_snippet, "# Payments");
    }

    #[test]
    fn test_host_shaped_repository_is_accepted() {
        let repo = normalize_repository(&json!({
            "id": 1,
            "name": "site",
            "full_name": "ada/site",
            "description": null,
            "html_url": "https://github.com/ada/site",
            "language": "TypeScript",
            "topics": ["nextjs", "nextjs"],
            "stargazers_count": 3,
            "forks_count": 1,
            "owner": {"login": "ada"},
            "default_branch": "main"
        }))
        .unwrap();
        assert_eq!(repo.url, "https://github.com/ada/site");
        assert_eq!(repo.stars, 3);
        assert_eq!(repo.forks, 1);
        assert_eq!(repo.owner, "ada");
        assert_eq!(repo.topics, vec!["nextjs"]);
        assert_eq!(repo.description, "");
    }

    #[test]
    fn test_non_object_repositories_are_skipped() {
        let repos = normalize_repositories(&json!([{"name": "a"}, "b", 3, null]));
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "a");
    }
}
