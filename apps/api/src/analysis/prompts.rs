// LLM prompt constants for the profile analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::generation::ranking::rank_repositories;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::Prompt;
use crate::models::profile::RepositorySummary;
use crate::text::render_template;

/// Higher than generation: the analysis is prose-heavy and rerunning it should vary.
pub const ANALYSIS_TEMPERATURE: f32 = 0.7;
pub const ANALYSIS_MAX_TOKENS: u32 = 1500;

pub const ANALYSIS_OUTPUT_SCHEMA: &str = r#"{
  "json_output": {
    "name": "string",
    "executive_summary": "string",
    "skills": [ { "skill": "string", "level": "familiar | working | strong", "description": "string" } ],
    "projects": [ { "name": "string", "short_desc": "string", "tech": ["string"], "bullets": ["string"], "url": "string" } ],
    "sources": { "repo_count": 0, "top_repo_names": ["string"] }
  },
  "markdown_output": "string"
}"#;

/// System prompt for profile analysis.
/// Replace: {grounding_instruction}, {json_only_instruction}, {output_schema}
pub const ANALYSIS_SYSTEM_TEMPLATE: &str = r#"You are an expert technical writer and career coach who writes natural, concise professional summaries for software developers.
Use active verbs and concrete outcomes. Keep filler and templated phrases to a minimum.

{grounding_instruction}

RULES:
1. Executive summary: 2 to 3 short sentences naming a concrete skill or achievement. Avoid boilerplate like "demonstrating proficiency".
2. Skills: list at most 8. For each, 1 to 2 sentences on how it is used, mentioning a repository where possible.
3. Project highlights: pick at most 5 repositories, ranked by stars and then by commit activity. Give each 2 to 3 bullets: purpose, key technology, and one outcome it demonstrates.
4. Fields that do not apply are empty strings or empty arrays.
5. Return the structured data under "json_output" and a Markdown preview under "markdown_output".

OUTPUT FORMAT (strict JSON):
{output_schema}

{json_only_instruction}"#;

/// User message for profile analysis.
/// Replace: {username}, {projects}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Below is raw analysis data extracted from a candidate's GitHub.

name: "{username}"
projects:
{projects}"#;

/// Builds the analysis prompt. Projects are listed in rank order, one per line.
pub fn build_analysis_prompt(username: &str, repositories: &[RepositorySummary]) -> Prompt {
    let projects = rank_repositories(repositories)
        .iter()
        .map(|repo| project_line(repo))
        .collect::<Vec<_>>()
        .join("\n");

    let system = render_template(
        ANALYSIS_SYSTEM_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
            ("output_schema", ANALYSIS_OUTPUT_SCHEMA),
        ],
    );
    let user = render_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[("username", username), ("projects", projects.as_str())],
    );

    Prompt {
        system,
        user,
        temperature: ANALYSIS_TEMPERATURE,
        max_tokens: Some(ANALYSIS_MAX_TOKENS),
    }
}

fn project_line(repo: &RepositorySummary) -> String {
    let language = if repo.language.is_empty() {
        "unknown"
    } else {
        repo.language.as_str()
    };
    let description = if repo.description.is_empty() {
        "No description"
    } else {
        repo.description.as_str()
    };
    format!(
        "- {} ({}): {} | Stars: {} | Forks: {} | Commits: {}",
        repo.name, language, description, repo.stars, repo.forks, repo.commits
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, stars: u64) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            language: "Rust".to_string(),
            stars,
            ..Default::default()
        }
    }

    #[test]
    fn test_projects_listed_in_rank_order() {
        let prompt = build_analysis_prompt("ada", &[repo("small", 1), repo("big", 9)]);
        let big = prompt.user.find("- big").unwrap();
        let small = prompt.user.find("- small").unwrap();
        assert!(big < small);
        assert!(prompt.user.contains("name: \"ada\""));
        assert!(prompt.user.contains("(Rust): No description | Stars: 9"));
    }

    #[test]
    fn test_system_prompt_is_fully_rendered() {
        let prompt = build_analysis_prompt("", &[]);
        assert!(!prompt.system.contains("{output_schema}"));
        assert!(prompt.system.contains("\"markdown_output\""));
        assert_eq!(prompt.temperature, ANALYSIS_TEMPERATURE);
    }
}
