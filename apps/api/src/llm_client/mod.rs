/// LLM Client: the single point of entry for all chat-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the backend directly.
/// Stage pipelines talk to `dyn LlmBackend`; `LlmClient` is the HTTP implementation.
///
/// One call, one request. There is no retry loop here: a failed request is
/// reported to the caller, which decides what the failure means for its stage.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod extract;
pub mod prompts;

#[cfg(test)]
pub mod testing;

/// Longest backend error body carried into an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM_API_KEY is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// User-turn content: plain text, or text mixed with inline images/documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageUrl {
    /// A `data:<mime>;base64,...` URL.
    pub url: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Everything one backend call needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: MessageContent,
}

/// The backend seam. Production uses `LlmClient`; tests swap in scripted doubles.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Performs exactly one request and returns the first choice's text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: MessageContent,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl ChatResponse {
    /// First choice's content. A response without one reads as empty text;
    /// the extraction step downstream decides what that means.
    fn into_text(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// HTTP client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completion client for an OpenAI-compatible gateway.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(config.llm_timeout_secs))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone(),
        }
    }
}

#[async_trait]
impl LlmBackend for LlmClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let body = ChatRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.system.clone()),
                },
                ChatMessage {
                    role: "user",
                    content: request.user.clone(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}", status);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_message(&raw),
            });
        }

        let raw = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&raw)?;
        let text = parsed.into_text();

        if text.is_empty() {
            warn!("LLM call succeeded but returned no completion text");
        }
        debug!(
            "LLM call succeeded: model={}, completion_chars={}",
            request.model,
            text.chars().count()
        );

        Ok(text)
    }
}

/// Pulls `error.message` out of a gateway error body, falling back to the raw text.
fn error_message(raw: &str) -> String {
    let message = serde_json::from_str::<ApiErrorEnvelope>(raw)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| raw.trim().to_string());
    truncate_chars(&message, MAX_ERROR_BODY_CHARS)
}

/// Truncates on a char boundary, appending an ellipsis when shortened.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
