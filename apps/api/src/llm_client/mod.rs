/// LLM Client: the single point of entry for all completion calls in Repofolio.
///
/// ARCHITECTURAL RULE: No other module may call the completion API directly.
/// All LLM interactions MUST go through this module, and this module alone decides
/// which upstream failures count as a quota condition (`LlmError::QuotaExceeded`).
///
/// Model: gpt-4o (hardcoded, not configurable)
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
/// The model used for all LLM calls in Repofolio.
pub const MODEL: &str = "gpt-4o";
const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Provider error codes (or error types) that mean "you are over your allowance".
const QUOTA_ERROR_CODES: &[&str] = &["insufficient_quota", "rate_limit_exceeded"];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Quota or rate limit exceeded (status {status}): {message}")]
    QuotaExceeded { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// True for the one failure class that selects the deterministic fallback.
    pub fn is_quota(&self) -> bool {
        matches!(self, LlmError::QuotaExceeded { .. })
    }
}

/// A fully rendered prompt, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// The message content of a completion.
///
/// Structured-output mode usually yields a JSON string, but some gateways hand
/// back the object already decoded. Both shapes are kept distinct here and
/// resolved in exactly one place (`generation::reconciler::parse_completion`).
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Raw(String),
    Parsed(Value),
}

impl Completion {
    fn from_content(content: Value) -> Result<Self, LlmError> {
        match content {
            Value::Null => Err(LlmError::EmptyContent),
            Value::String(text) => Ok(Completion::Raw(text)),
            other => Ok(Completion::Parsed(other)),
        }
    }
}

/// Seam between handlers and the completion backend.
/// Carried in `AppState` as `Arc<dyn CompletionProvider>`.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// The single LLM client used by all services in Repofolio.
/// Wraps an OpenAI-compatible chat-completions API in JSON-object mode.
/// No retries: a failed call is either a quota condition or reported immediately.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build LLM HTTP client")?;
        Ok(Self { client, api_key })
    }

    /// Makes a single call to the completion API and returns the message content.
    pub async fn call(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        let request_body = build_request(prompt);

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_failure(status.as_u16(), &body);
            warn!("LLM API returned {}: {}", status, err);
            return Err(err);
        }

        let chat: ChatResponse = response.json().await?;

        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(LlmError::EmptyContent)?;

        Completion::from_content(content)
    }
}

#[async_trait]
impl CompletionProvider for LlmClient {
    async fn complete(&self, prompt: &Prompt) -> Result<Completion, LlmError> {
        self.call(prompt).await
    }
}

fn build_request(prompt: &Prompt) -> ChatRequest<'_> {
    ChatRequest {
        model: MODEL,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &prompt.system,
            },
            ChatMessage {
                role: "user",
                content: &prompt.user,
            },
        ],
        temperature: prompt.temperature,
        max_tokens: prompt.max_tokens,
        response_format: ResponseFormat {
            kind: "json_object",
        },
    }
}

/// Turns a non-2xx reply into an `LlmError`, deciding whether it is a quota condition.
///
/// Quota: HTTP 429, a known quota error code or type, or, as a last resort,
/// a provider message mentioning "quota".
fn classify_failure(status: u16, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<ProviderError>(body)
        .ok()
        .map(|e| e.error);

    let message = parsed
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let quota_code = parsed.as_ref().is_some_and(|e| {
        [e.code.as_deref(), e.kind.as_deref()]
            .into_iter()
            .flatten()
            .any(|c| QUOTA_ERROR_CODES.contains(&c))
    });

    if status == 429 || quota_code || message.to_lowercase().contains("quota") {
        LlmError::QuotaExceeded { status, message }
    } else {
        LlmError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_429_is_quota() {
        let err = classify_failure(429, "slow down");
        assert!(err.is_quota());
    }

    #[test]
    fn test_insufficient_quota_code_is_quota_even_without_429() {
        let body = json!({
            "error": {
                "message": "You exceeded your current plan.",
                "type": "billing_error",
                "code": "insufficient_quota"
            }
        })
        .to_string();
        let err = classify_failure(403, &body);
        assert!(err.is_quota());
    }

    #[test]
    fn test_quota_in_message_is_quota() {
        let body = json!({"error": {"message": "Monthly Quota reached", "code": null}}).to_string();
        assert!(classify_failure(400, &body).is_quota());
    }

    #[test]
    fn test_other_failures_are_api_errors() {
        let body = json!({"error": {"message": "Invalid model", "code": "model_not_found"}})
            .to_string();
        match classify_failure(404, &body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Invalid model");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_error_body_keeps_raw_text() {
        match classify_failure(500, "upstream exploded") {
            LlmError::Api { message, .. } => assert_eq!(message, "upstream exploded"),
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_completion_from_string_content_is_raw() {
        let c = Completion::from_content(json!("{\"summary\":\"x\"}")).unwrap();
        assert_eq!(c, Completion::Raw("{\"summary\":\"x\"}".to_string()));
    }

    #[test]
    fn test_completion_from_object_content_is_parsed() {
        let c = Completion::from_content(json!({"summary": "x"})).unwrap();
        assert_eq!(c, Completion::Parsed(json!({"summary": "x"})));
    }

    #[test]
    fn test_completion_from_null_content_is_empty() {
        assert!(matches!(
            Completion::from_content(Value::Null),
            Err(LlmError::EmptyContent)
        ));
    }

    #[test]
    fn test_request_asks_for_json_object_mode() {
        let prompt = Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
            temperature: 0.2,
            max_tokens: Some(2000),
        };
        let body = serde_json::to_value(build_request(&prompt)).unwrap();
        assert_eq!(body["model"], MODEL);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "usr");
        assert_eq!(body["max_tokens"], 2000);
    }

    #[test]
    fn test_request_omits_absent_max_tokens() {
        let prompt = Prompt {
            system: String::new(),
            user: String::new(),
            temperature: 0.7,
            max_tokens: None,
        };
        let body = serde_json::to_value(build_request(&prompt)).unwrap();
        assert!(body.get("max_tokens").is_none());
    }
}
