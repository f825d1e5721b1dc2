use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::github::RepositoryHost;
use crate::llm_client::CompletionProvider;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    /// `None` when `OPENAI_API_KEY` is unset; LLM endpoints then fail with a configuration error.
    pub llm: Option<Arc<dyn CompletionProvider>>,
    pub repos: Arc<dyn RepositoryHost>,
    pub config: Config,
}

impl AppState {
    /// The completion backend, or a configuration error before any network call is made.
    pub fn completion_provider(&self) -> Result<&dyn CompletionProvider, AppError> {
        self.llm.as_deref().ok_or_else(|| {
            AppError::Configuration("OPENAI_API_KEY is not defined in environment variables".into())
        })
    }
}

#[cfg(test)]
pub mod test_support {
    //! In-process stand-ins for the completion backend and the repository host.

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::AppState;
    use crate::config::Config;
    use crate::github::{GithubError, GithubOwner, GithubRepo, RepositoryHost};
    use crate::llm_client::{Completion, CompletionProvider, LlmError, Prompt};

    #[derive(Debug, Clone)]
    pub enum StubReply {
        Quota,
        ApiFailure,
        Completion(Completion),
    }

    pub struct StubCompletion {
        reply: StubReply,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<Prompt>>,
    }

    impl StubCompletion {
        pub fn new(reply: StubReply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_prompt(&self) -> Option<Prompt> {
            self.last_prompt.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubCompletion {
        async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some(prompt.clone());
            match &self.reply {
                StubReply::Quota => Err(LlmError::QuotaExceeded {
                    status: 429,
                    message: "You exceeded your current quota".to_string(),
                }),
                StubReply::ApiFailure => Err(LlmError::Api {
                    status: 500,
                    message: "upstream exploded".to_string(),
                }),
                StubReply::Completion(completion) => Ok(completion.clone()),
            }
        }
    }

    #[derive(Debug, Clone)]
    pub enum StubReadme {
        Text(String),
        Status(u16),
        /// Never resolves; exercises the per-fetch timeout.
        Hang,
    }

    #[derive(Default)]
    pub struct StubHost {
        readmes: HashMap<(String, String), StubReadme>,
        repos: Vec<GithubRepo>,
        list_error: Option<(u16, String)>,
        readme_calls: AtomicUsize,
    }

    impl StubHost {
        pub fn with_readme(mut self, owner: &str, repo: &str, readme: StubReadme) -> Self {
            self.readmes
                .insert((owner.to_string(), repo.to_string()), readme);
            self
        }

        pub fn with_repo(mut self, owner: &str, name: &str, stars: u64) -> Self {
            self.repos.push(GithubRepo {
                id: self.repos.len() as u64 + 1,
                name: name.to_string(),
                full_name: format!("{owner}/{name}"),
                description: None,
                html_url: format!("https://github.com/{owner}/{name}"),
                language: Some("Rust".to_string()),
                topics: Vec::new(),
                stargazers_count: stars,
                forks_count: 0,
                owner: GithubOwner {
                    login: owner.to_string(),
                },
                default_branch: Some("main".to_string()),
                private: false,
            });
            self
        }

        /// Makes `list_repositories` fail with this host status and body.
        pub fn with_list_error(mut self, status: u16, body: &str) -> Self {
            self.list_error = Some((status, body.to_string()));
            self
        }

        pub fn readme_calls(&self) -> usize {
            self.readme_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RepositoryHost for StubHost {
        async fn list_repositories(
            &self,
            _token: &str,
            per_page: u32,
        ) -> Result<Vec<GithubRepo>, GithubError> {
            if let Some((status, body)) = &self.list_error {
                return Err(GithubError::Status {
                    status: *status,
                    body: body.clone(),
                });
            }
            Ok(self.repos.iter().take(per_page as usize).cloned().collect())
        }

        async fn fetch_readme(
            &self,
            _token: &str,
            owner: &str,
            repo: &str,
        ) -> Result<String, GithubError> {
            self.readme_calls.fetch_add(1, Ordering::SeqCst);
            match self.readmes.get(&(owner.to_string(), repo.to_string())) {
                Some(StubReadme::Text(text)) => Ok(text.clone()),
                Some(StubReadme::Status(status)) => Err(GithubError::Status {
                    status: *status,
                    body: "Not Found".to_string(),
                }),
                Some(StubReadme::Hang) => std::future::pending().await,
                None => Err(GithubError::Status {
                    status: 404,
                    body: "Not Found".to_string(),
                }),
            }
        }
    }

    pub fn test_config() -> Config {
        Config {
            openai_api_key: Some("sk-test".to_string()),
            github_api_url: "http://127.0.0.1:1".to_string(),
            readme_timeout_secs: 5,
            cors_allowed_origin: None,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }

    pub fn test_state(
        llm: Option<Arc<dyn CompletionProvider>>,
        repos: Arc<dyn RepositoryHost>,
    ) -> AppState {
        AppState {
            llm,
            repos,
            config: test_config(),
        }
    }
}
