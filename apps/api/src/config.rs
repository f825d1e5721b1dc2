use anyhow::{Context, Result};

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_README_TIMEOUT_SECS: u64 = 5;

/// Application configuration loaded from environment variables.
///
/// Nothing is strictly required at startup. A missing `OPENAI_API_KEY` is
/// reported per request as a configuration error so the repository endpoints
/// keep working without LLM credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub github_api_url: String,
    pub readme_timeout_secs: u64,
    pub cors_allowed_origin: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            github_api_url: optional_env("GITHUB_API_URL")
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            readme_timeout_secs: match optional_env("README_FETCH_TIMEOUT_SECS") {
                Some(raw) => raw
                    .parse::<u64>()
                    .context("README_FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
                None => DEFAULT_README_TIMEOUT_SECS,
            },
            cors_allowed_origin: optional_env("CORS_ALLOWED_ORIGIN"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads an env var, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
