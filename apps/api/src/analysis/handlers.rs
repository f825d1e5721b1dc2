//! Axum route handlers for the Profile Analysis API.

use axum::{extract::State, Json};
use serde_json::Value;

use crate::analysis::{analyze_profile, AnalysisResult};
use crate::errors::{AppError, ValidationIssue};
use crate::generation::normalizer::normalize_repositories;
use crate::models::lenient::value_to_text;
use crate::state::AppState;

/// POST /api/analyze
///
/// Body: `{ projects: [...], username }`. `projects` must be an array.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Some(projects) = body.get("projects").filter(|p| p.is_array()) else {
        return Err(AppError::validation(vec![ValidationIssue::new(
            "projects",
            "projects must be an array",
        )]));
    };
    let llm = state.completion_provider()?;

    let repositories = normalize_repositories(projects);
    let username = body.get("username").map(value_to_text).unwrap_or_default();

    let result = analyze_profile(llm, &username, &repositories).await?;
    Ok(Json(result))
}
