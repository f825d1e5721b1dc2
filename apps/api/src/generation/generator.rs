//! Resume Generation: orchestrates one generation call.
//!
//! Flow: build prompt → single LLM call → reconcile reply.
//! A quota/rate-limit failure switches to the deterministic fallback instead of
//! failing the request; every other failure propagates.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::fallback::generate_fallback;
use crate::generation::prompt_builder::build_generation_prompt;
use crate::generation::reconciler::reconcile_completion;
use crate::llm_client::CompletionProvider;
use crate::models::profile::{CandidateProfile, RepositorySummary};
use crate::models::result::GenerationResult;

pub async fn generate_resume(
    llm: &dyn CompletionProvider,
    profile: &CandidateProfile,
    repositories: &[RepositorySummary],
) -> Result<GenerationResult, AppError> {
    let prompt = build_generation_prompt(profile, repositories)?;

    info!(
        "Generating resume: target_role={:?}, repos={}, languages={}, resume_chars={}",
        profile.target_role,
        repositories.len(),
        profile.detected_languages.len(),
        profile.resume_text.chars().count()
    );

    match llm.complete(&prompt).await {
        Ok(completion) => {
            let result = reconcile_completion(completion, profile)?;
            info!(
                "Resume generated: skills={}, projects={}, experience={}, education={}",
                result.skills.len(),
                result.projects.len(),
                result.experience.len(),
                result.education.len()
            );
            Ok(result)
        }
        Err(e) if e.is_quota() => {
            warn!("Using deterministic fallback due to quota/limit: {e}");
            Ok(generate_fallback(profile, repositories))
        }
        Err(e) => Err(e.into()),
    }
}
