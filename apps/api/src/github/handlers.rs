//! Axum route handlers for the repository host proxy.

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::github::{bearer_token, GithubRepo};
use crate::state::AppState;

const DEFAULT_PER_PAGE: u32 = 100;
const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListReposQuery {
    pub per_page: Option<u32>,
}

/// Lightweight repository shape returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryView {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub stars: u64,
    pub forks: u64,
    pub owner: String,
    pub default_branch: Option<String>,
    pub private: bool,
}

impl From<GithubRepo> for RepositoryView {
    fn from(repo: GithubRepo) -> Self {
        Self {
            id: repo.id,
            name: repo.name,
            full_name: repo.full_name,
            description: repo.description,
            html_url: repo.html_url,
            language: repo.language,
            topics: repo.topics,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            owner: repo.owner.login,
            default_branch: repo.default_branch,
            private: repo.private,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListReposResponse {
    pub status: &'static str,
    pub repos: Vec<RepositoryView>,
}

/// GET /api/github/repos?per_page=N
///
/// Lists the token owner's repositories, most recently updated first.
pub async fn handle_list_repos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListReposQuery>,
) -> Result<Json<ListReposResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::UpstreamAuth)?;
    let per_page = clamp_per_page(query.per_page);

    let repos = state.repos.list_repositories(token, per_page).await?;
    info!("Listed {} repositories", repos.len());

    Ok(Json(ListReposResponse {
        status: "success",
        repos: repos.into_iter().map(RepositoryView::from).collect(),
    }))
}

fn clamp_per_page(requested: Option<u32>) -> u32 {
    requested.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
}
