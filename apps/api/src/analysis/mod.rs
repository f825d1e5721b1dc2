//! Profile analysis: a short summary, skill list and project highlights for a
//! set of repositories. Shares the completion parser, synonym table and ranking
//! with resume generation.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::analysis::fallback::analysis_fallback;
use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::generation::reconciler::{apply_synonyms, parse_completion};
use crate::llm_client::{Completion, CompletionProvider};
use crate::models::lenient::{field_string, value_to_string, value_to_strings};
use crate::models::profile::RepositorySummary;

pub mod fallback;
pub mod handlers;
pub mod prompts;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectHighlight {
    pub name: String,
    pub details: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectHighlight>,
    pub is_fallback: bool,
    /// The model's full reply, for clients that want the richer shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

pub async fn analyze_profile(
    llm: &dyn CompletionProvider,
    username: &str,
    repositories: &[RepositorySummary],
) -> Result<AnalysisResult, AppError> {
    let prompt = build_analysis_prompt(username, repositories);
    info!("Analyzing profile: repos={}", repositories.len());

    match llm.complete(&prompt).await {
        Ok(completion) => reconcile_analysis(completion),
        Err(e) if e.is_quota() => {
            warn!("Using analysis fallback due to quota/limit: {e}");
            Ok(analysis_fallback(repositories))
        }
        Err(e) => Err(e.into()),
    }
}

/// Reads the model reply. The structured part may sit under `json_output` or at the top level.
pub fn reconcile_analysis(completion: Completion) -> Result<AnalysisResult, AppError> {
    let reply = parse_completion(completion)?;

    let mut data = match reply.get("json_output") {
        Some(Value::Object(inner)) => inner.clone(),
        _ => reply.clone(),
    };
    apply_synonyms(&mut data);

    let summary = data.get("summary").map(value_to_string).unwrap_or_default();

    let skills = list(&data, "skills")
        .iter()
        .map(|item| match item {
            Value::Object(obj) => field_string(obj, &["skill", "name"]),
            other => value_to_string(other),
        })
        .filter(|s| !s.is_empty())
        .collect();

    let projects = list(&data, "projects")
        .iter()
        .filter_map(Value::as_object)
        .map(highlight)
        .collect();

    Ok(AnalysisResult {
        summary,
        skills,
        projects,
        is_fallback: false,
        raw: Some(Value::Object(reply)),
    })
}

fn list<'a>(data: &'a Map<String, Value>, field: &str) -> &'a [Value] {
    data.get(field)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn highlight(project: &Map<String, Value>) -> ProjectHighlight {
    let mut parts = vec![field_string(project, &["short_desc", "shortDesc", "description"])];
    parts.extend(project.get("bullets").map(value_to_strings).unwrap_or_default());

    ProjectHighlight {
        name: field_string(project, &["name"]),
        details: parts
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}
