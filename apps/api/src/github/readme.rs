//! Concurrent README snippet enrichment.
//!
//! Each fetch is independent and bounded by a timeout. A failure or timeout
//! leaves that repository's snippet empty and never affects the others.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::github::{RepositoryHost, README_SNIPPET_CHARS};
use crate::models::profile::RepositorySummary;
use crate::text::truncate_chars;

/// Fills `readme_snippet` for every repository that has an owner and no snippet yet.
/// Returns how many snippets were attached.
pub async fn attach_readme_snippets(
    host: &dyn RepositoryHost,
    token: &str,
    repositories: &mut [RepositorySummary],
    timeout: Duration,
) -> usize {
    let fetches = repositories.iter().map(|repo| async move {
        if repo.owner.is_empty() || repo.name.is_empty() || !repo.readme_snippet.is_empty() {
            return None;
        }

        match tokio::time::timeout(timeout, host.fetch_readme(token, &repo.owner, &repo.name))
            .await
        {
            Ok(Ok(text)) => Some(truncate_chars(text.trim(), README_SNIPPET_CHARS).to_string()),
            Ok(Err(e)) => {
                warn!("Failed README fetch for {}/{}: {e}", repo.owner, repo.name);
                None
            }
            Err(_) => {
                warn!(
                    "README fetch for {}/{} timed out after {:?}",
                    repo.owner, repo.name, timeout
                );
                None
            }
        }
    });

    let snippets = join_all(fetches).await;

    let mut attached = 0;
    for (repo, snippet) in repositories.iter_mut().zip(snippets) {
        if let Some(snippet) = snippet.filter(|s| !s.is_empty()) {
            repo.readme_snippet = snippet;
            attached += 1;
        }
    }
    debug!("Attached {} README snippets", attached);
    attached
}
