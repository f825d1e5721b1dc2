//! Axum route handlers for the Resume Generation API.

use std::time::Duration;

use axum::{extract::State, http::HeaderMap, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::generation::generator::generate_resume;
use crate::generation::markdown::render_markdown;
use crate::generation::normalizer::normalize_generation_request;
use crate::generation::ranking::{sort_by_rank, MAX_PROJECTS};
use crate::github::bearer_token;
use crate::github::readme::attach_readme_snippets;
use crate::models::result::GenerationResult;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub status: &'static str,
    pub json_output: GenerationResult,
    pub markdown_resume: String,
    pub generated_at: DateTime<Utc>,
    pub is_fallback: bool,
}

/// POST /api/resume/generate
///
/// Normalize → (optional README enrichment) → generate → render Markdown.
/// Validation runs first so a bad body is a 400 regardless of server configuration.
pub async fn handle_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = normalize_generation_request(&body)?;
    let llm = state.completion_provider()?;

    let profile = request.profile;
    let mut repositories = request.repositories;
    sort_by_rank(&mut repositories);

    if let Some(token) = bearer_token(&headers) {
        let top = repositories.len().min(MAX_PROJECTS);
        attach_readme_snippets(
            state.repos.as_ref(),
            token,
            &mut repositories[..top],
            Duration::from_secs(state.config.readme_timeout_secs),
        )
        .await;
    }

    let result = generate_resume(llm, &profile, &repositories).await?;
    let markdown_resume = render_markdown(&result);

    info!(
        "Resume response ready: fallback={}, markdown_chars={}",
        result.is_fallback,
        markdown_resume.chars().count()
    );

    Ok(Json(GenerateResponse {
        status: "success",
        is_fallback: result.is_fallback,
        json_output: result,
        markdown_resume,
        generated_at: Utc::now(),
    }))
}
