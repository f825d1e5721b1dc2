//! Deterministic Fallback Generator: builds a resume from request data alone.
//!
//! Only used when the completion call fails with `LlmError::QuotaExceeded`.
//! No network, no randomness: identical input yields identical output.

use crate::generation::ranking::{top_repositories, MAX_PROJECTS};
use crate::models::profile::{CandidateProfile, RepositorySummary};
use crate::models::result::{GenerationResult, ProjectEntry, SkillEntry};

pub const DEFAULT_ROLE: &str = "Software Engineer";
pub const FALLBACK_NOTE: &str = "Generated via deterministic fallback (no hallucination).";

const MAX_SKILLS: usize = 8;
const SUMMARY_LANGUAGES: usize = 3;
const SUMMARY_PROJECT_NAMES: usize = 2;
const NO_LANGUAGES: &str = "modern web technologies";
const NO_TECH: &str = "modern tooling";

const BACKEND_KEYWORDS: &[&str] = &["api", "server", "backend"];
const FRONTEND_KEYWORDS: &[&str] = &["site", "web", "portfolio"];

/// Hand-written skill descriptions for frequently seen languages (matched case-insensitively).
const LANGUAGE_DESCRIPTIONS: &[(&str, &str)] = &[
    ("Rust", "Systems programming in Rust with an emphasis on memory safety and predictable performance."),
    ("Go", "Concurrent services and CLIs in Go, built around small, composable packages."),
    ("Python", "Scripting, automation and data work in Python."),
    ("TypeScript", "Type-safe application code in TypeScript across frontend and backend."),
    ("JavaScript", "Interactive web functionality and tooling in JavaScript."),
    ("Java", "Object-oriented backend development in Java."),
    ("Kotlin", "Modern JVM and Android development in Kotlin."),
    ("C", "Low-level programming in C close to the operating system."),
    ("C++", "Performance-sensitive software in C++."),
    ("C#", "Application and service development in C# on .NET."),
    ("Ruby", "Web applications and scripting in Ruby."),
    ("PHP", "Server-rendered web applications in PHP."),
    ("Swift", "Native Apple platform development in Swift."),
    ("Shell", "Build, deployment and automation scripts in shell."),
    ("HTML", "Semantic, accessible page structure in HTML."),
    ("CSS", "Responsive layouts and styling in CSS."),
];

/// Produces a complete `GenerationResult` marked `is_fallback = true`.
pub fn generate_fallback(
    profile: &CandidateProfile,
    repositories: &[RepositorySummary],
) -> GenerationResult {
    let top = top_repositories(repositories, MAX_PROJECTS);

    GenerationResult {
        name: profile.name.clone(),
        contact: profile.contact.clone(),
        summary: fallback_summary(profile, repositories.len(), &top),
        skills: profile
            .detected_languages
            .iter()
            .take(MAX_SKILLS)
            .map(|lang| SkillEntry {
                skill: lang.clone(),
                description: describe_language(lang),
                ..Default::default()
            })
            .collect(),
        projects: top.iter().map(|repo| fallback_project(repo)).collect(),
        experience: Vec::new(),
        education: Vec::new(),
        is_fallback: true,
        notes: Some(FALLBACK_NOTE.to_string()),
        extra: Default::default(),
    }
}

fn fallback_summary(
    profile: &CandidateProfile,
    project_count: usize,
    top: &[&RepositorySummary],
) -> String {
    let role = match profile.target_role.trim() {
        "" => DEFAULT_ROLE,
        role => role,
    };

    let languages = profile
        .detected_languages
        .iter()
        .take(SUMMARY_LANGUAGES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let languages = if languages.is_empty() {
        NO_LANGUAGES
    } else {
        languages.as_str()
    };

    let mut summary = format!("Results-driven {role} with experience in {languages}.");

    if project_count > 0 {
        let noun = if project_count == 1 {
            "repository"
        } else {
            "repositories"
        };
        summary.push_str(&format!(" Contributed to {project_count} GitHub {noun}"));

        let names = top
            .iter()
            .map(|r| r.name.as_str())
            .filter(|n| !n.is_empty())
            .take(SUMMARY_PROJECT_NAMES)
            .collect::<Vec<_>>();
        if !names.is_empty() {
            summary.push_str(&format!(" including {}", names.join(" and ")));
        }
        summary.push('.');
    }

    summary
}

fn describe_language(lang: &str) -> String {
    LANGUAGE_DESCRIPTIONS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(lang))
        .map(|(_, description)| description.to_string())
        .unwrap_or_else(|| format!("Experience using {lang} (derived from repository metadata)."))
}

fn fallback_project(repo: &RepositorySummary) -> ProjectEntry {
    let tech = repo.tech_stack();

    let purpose = if repo.description.is_empty() {
        format!("Contributed to {}", repo.name)
    } else {
        format!("Worked on {}: {}", repo.name, repo.description)
    };

    ProjectEntry {
        name: repo.name.clone(),
        short_desc: repo.description.clone(),
        bullets: vec![purpose, outcome_bullet(&repo.name, &tech)],
        tech,
        url: repo.url.clone(),
        ..Default::default()
    }
}

/// Technology/outcome sentence, flavoured by keywords in the repository name.
fn outcome_bullet(name: &str, tech: &[String]) -> String {
    let name = name.to_lowercase();
    let tech = if tech.is_empty() {
        NO_TECH.to_string()
    } else {
        tech.join(", ")
    };

    if BACKEND_KEYWORDS.iter().any(|k| name.contains(k)) {
        format!(
            "Built backend services with {tech}, focusing on reliable request handling and clear API contracts."
        )
    } else if FRONTEND_KEYWORDS.iter().any(|k| name.contains(k)) {
        format!("Delivered a responsive web frontend with {tech}, tuned for fast page loads.")
    } else {
        format!("Applied {tech} to implement the project's core functionality.")
    }
}
