//! Language-frequency fallback for profile analysis (quota path only).

use crate::analysis::{AnalysisResult, ProjectHighlight};
use crate::generation::ranking::{top_repositories, MAX_PROJECTS};
use crate::models::profile::RepositorySummary;

const MAX_SKILLS: usize = 8;
const NO_LANGUAGES: &str = "modern web technologies";

pub fn analysis_fallback(repositories: &[RepositorySummary]) -> AnalysisResult {
    let languages = languages_by_frequency(repositories);
    let primary = languages.first().map_or(NO_LANGUAGES, String::as_str);

    let summary = format!(
        "Software developer focused on practical, maintainable web apps and {primary} tools. \
         Maintains an active portfolio of {} repositories that showcase full-stack projects, \
         often emphasizing clean architecture and quick iteration cycles.",
        repositories.len()
    );

    let projects = top_repositories(repositories, MAX_PROJECTS)
        .into_iter()
        .map(|repo| ProjectHighlight {
            name: repo.name.clone(),
            details: if repo.description.is_empty() {
                let lang = if repo.language.is_empty() {
                    "software"
                } else {
                    repo.language.as_str()
                };
                format!(
                    "A {lang} project demonstrating core development principles and practical implementation of {lang} features."
                )
            } else {
                repo.description.clone()
            },
        })
        .collect();

    AnalysisResult {
        summary,
        skills: languages.into_iter().take(MAX_SKILLS).collect(),
        projects,
        is_fallback: true,
        raw: None,
    }
}

/// Distinct primary languages, most frequent first; ties keep first-seen order.
fn languages_by_frequency(repositories: &[RepositorySummary]) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for lang in repositories
        .iter()
        .map(|r| r.language.as_str())
        .filter(|l| !l.is_empty())
    {
        match counts.iter_mut().find(|(seen, _)| *seen == lang) {
            Some((_, count)) => *count += 1,
            None => counts.push((lang, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(l, _)| l.to_string()).collect()
}
