//! Repository host (GitHub REST v3) client.
//!
//! Read-only: the authenticated user's repository list and per-repository README
//! text. The bearer token comes from the caller; this service never runs the
//! OAuth handshake itself.

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;
pub mod readme;

/// Characters of README text kept per repository.
pub const README_SNIPPET_CHARS: usize = 2000;

const USER_AGENT: &str = concat!("repofolio-api/", env!("CARGO_PKG_VERSION"));
const JSON_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// Repository as returned by `GET /user/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    pub owner: GithubOwner,
    pub default_branch: Option<String>,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubOwner {
    pub login: String,
}

/// Seam between handlers and the repository host.
/// Carried in `AppState` as `Arc<dyn RepositoryHost>`.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn list_repositories(
        &self,
        token: &str,
        per_page: u32,
    ) -> Result<Vec<GithubRepo>, GithubError>;

    async fn fetch_readme(&self, token: &str, owner: &str, repo: &str)
        -> Result<String, GithubError>;
}

#[derive(Clone)]
pub struct GithubClient {
    client: Client,
    base_url: String,
}

impl GithubClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build GitHub HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(
        &self,
        path: &str,
        token: &str,
        accept: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, GithubError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GitHub GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, accept)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("GitHub API error on {}: {} {}", path, status, body);
            return Err(GithubError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RepositoryHost for GithubClient {
    async fn list_repositories(
        &self,
        token: &str,
        per_page: u32,
    ) -> Result<Vec<GithubRepo>, GithubError> {
        let response = self
            .get(
                "/user/repos",
                token,
                JSON_MEDIA_TYPE,
                &[
                    ("per_page", per_page.to_string()),
                    ("sort", "updated".to_string()),
                ],
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn fetch_readme(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
    ) -> Result<String, GithubError> {
        let path = format!("/repos/{owner}/{repo}/readme");
        let response = self.get(&path, token, RAW_MEDIA_TYPE, &[]).await?;
        Ok(response.text().await?)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
