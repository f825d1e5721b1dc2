use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::github::GithubError;
use crate::llm_client::LlmError;

/// A single field-level validation problem, reported back in 400 responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        issues: Vec<ValidationIssue>,
    },

    #[error("Missing or invalid repository host access token")]
    UpstreamAuth,

    #[error("Repository host returned {status}: {body}")]
    UpstreamFetch { status: u16, body: String },

    #[error("LLM returned an empty completion")]
    EmptyCompletion,

    #[error("LLM completion could not be parsed: {0}")]
    UnparsableCompletion(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Builds a validation error from a list of issues; the message summarizes the fields.
    pub fn validation(issues: Vec<ValidationIssue>) -> Self {
        let fields = issues
            .iter()
            .map(|i| i.field.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        AppError::Validation {
            message: format!("Invalid request body ({fields})"),
            issues,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::UpstreamAuth => StatusCode::UNAUTHORIZED,
            AppError::UpstreamFetch { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Configuration(_)
            | AppError::EmptyCompletion
            | AppError::UnparsableCompletion(_)
            | AppError::Llm(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::EmptyContent => AppError::EmptyCompletion,
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl From<GithubError> for AppError {
    fn from(err: GithubError) -> Self {
        match err {
            GithubError::Status { status, body } => AppError::UpstreamFetch { status, body },
            GithubError::Http(e) => AppError::Internal(anyhow::anyhow!(
                "Repository host request failed: {e}"
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details) = match &self {
            AppError::Configuration(msg) => {
                tracing::error!("Configuration error: {msg}");
                ("CONFIGURATION_ERROR", msg.clone(), None)
            }
            AppError::Validation { message, .. } => ("VALIDATION_ERROR", message.clone(), None),
            AppError::UpstreamAuth => (
                "UPSTREAM_AUTH_ERROR",
                "Missing GitHub access token".to_string(),
                None,
            ),
            AppError::UpstreamFetch { status, body } => {
                tracing::warn!("Repository host returned {status}");
                (
                    "UPSTREAM_FETCH_ERROR",
                    "Failed to fetch from GitHub".to_string(),
                    Some(body.clone()),
                )
            }
            AppError::EmptyCompletion => {
                tracing::error!("LLM returned an empty completion");
                (
                    "EMPTY_COMPLETION",
                    "Failed to generate resume".to_string(),
                    Some("No content received from the LLM".to_string()),
                )
            }
            AppError::UnparsableCompletion(detail) => {
                tracing::error!("Unparsable completion: {detail}");
                (
                    "UNPARSABLE_COMPLETION",
                    "Failed to generate resume".to_string(),
                    Some(detail.clone()),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                    Some(msg.clone()),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(e.to_string()),
                )
            }
        };

        let mut error = json!({
            "code": code,
            "message": message,
        });
        if let Some(details) = details {
            error["details"] = json!(details);
        }
        if let AppError::Validation { issues, .. } = &self {
            error["issues"] = json!(issues);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
