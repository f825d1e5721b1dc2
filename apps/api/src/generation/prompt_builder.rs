//! Prompt Builder: renders a normalized request into the generation prompt.
//!
//! Deterministic: the same profile and repositories always produce the same prompt.

use serde_json::json;

use crate::errors::AppError;
use crate::generation::prompts::{
    GENERATION_MAX_TOKENS, GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM_TEMPLATE,
    GENERATION_TEMPERATURE, RESUME_OUTPUT_SCHEMA, RESUME_TEXT_MAX_CHARS,
};
use crate::generation::ranking::rank_repositories;
use crate::github::README_SNIPPET_CHARS;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::Prompt;
use crate::models::profile::{CandidateProfile, RepositorySummary};
use crate::text::{render_template, truncate_chars};

const DEFAULT_TONE: &str = "neutral";

/// The fixed system instruction. Identical for every request.
pub fn generation_system_prompt() -> String {
    render_template(
        GENERATION_SYSTEM_TEMPLATE,
        &[
            ("grounding_instruction", GROUNDING_INSTRUCTION),
            ("json_only_instruction", JSON_ONLY_INSTRUCTION),
            ("output_schema", RESUME_OUTPUT_SCHEMA),
        ],
    )
}

/// Builds the full generation prompt: rules + schema (system) and serialized data (user).
pub fn build_generation_prompt(
    profile: &CandidateProfile,
    repositories: &[RepositorySummary],
) -> Result<Prompt, AppError> {
    let ranked = rank_repositories(repositories);

    let top_repos = ranked
        .iter()
        .map(|repo| {
            json!({
                "name": repo.name,
                "description": repo.description,
                "language": repo.language,
                "tech": repo.tech_stack(),
                "topics": repo.topics,
                "stars": repo.stars,
                "forks": repo.forks,
                "commits": repo.commits,
                "url": repo.url,
                "readme_snippet": truncate_chars(&repo.readme_snippet, README_SNIPPET_CHARS),
            })
        })
        .collect::<Vec<_>>();

    let total_repos = if profile.repo_count > 0 {
        profile.repo_count
    } else {
        repositories.len() as u64
    };

    let github_json = serde_json::to_string_pretty(&json!({
        "languages": profile.detected_languages,
        "top_repos": top_repos,
        "total_repos": total_repos,
        "target_role": profile.target_role,
    }))
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize GitHub data: {e}")))?;

    let tone = if profile.tone.is_empty() {
        DEFAULT_TONE
    } else {
        profile.tone.as_str()
    };

    let user = render_template(
        GENERATION_PROMPT_TEMPLATE,
        &[
            (
                "resume_text",
                truncate_chars(&profile.resume_text, RESUME_TEXT_MAX_CHARS),
            ),
            ("github_json", github_json.as_str()),
            ("tone", tone),
            ("target_role", profile.target_role.as_str()),
        ],
    );

    Ok(Prompt {
        system: generation_system_prompt(),
        user,
        temperature: GENERATION_TEMPERATURE,
        max_tokens: Some(GENERATION_MAX_TOKENS),
    })
}
