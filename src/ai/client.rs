//! Completion API client
//!
//! Talks to any OpenAI-compatible `chat/completions` endpoint. One request per analysis,
//! no retries.

use openai_api_rs::v1::chat_completion::{
    ChatCompletionMessage, ChatCompletionRequest, Content, MessageRole,
};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::errors::CompletionError;

pub const MAX_OUTPUT_TOKENS: i64 = 800;
pub const TEMPERATURE: f64 = 0.7;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

#[derive(Debug, Deserialize)]
struct ChatCompletionBody {
    #[serde(default)]
    choices: Vec<ChoiceBody>,
}

#[derive(Debug, Deserialize)]
struct ChoiceBody {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
    code: Option<Value>,
}

/// Client for the completion endpoint. Read-only after construction and safe to share.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    api_key: String,
    base_url: String,
    model_name: String,
}

impl LlmClient {
    #[must_use]
    pub fn new(api_key: String, base_url: String, model_name: String) -> Self {
        Self {
            http: Client::new(),
            api_key,
            base_url,
            model_name,
        }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.cloud_api_key.clone(),
            config.cloud_api_base_url.clone(),
            config.cloud_model_name.clone(),
        )
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    #[must_use]
    pub fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest::new(
            self.model_name.clone(),
            vec![ChatCompletionMessage {
                role: MessageRole::user,
                content: Content::Text(prompt.to_string()),
                name: None,
                tool_calls: None,
                tool_call_id: None,
            }],
        )
        .max_tokens(MAX_OUTPUT_TOKENS)
        .temperature(TEMPERATURE)
    }

    /// Sends `prompt` as a single user message and returns the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Api`] for non-success statuses, [`CompletionError::Transport`]
    /// when the request or body decoding fails, and [`CompletionError::EmptyResponse`] when the
    /// endpoint answers without text.
    pub async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        #[cfg(feature = "debug-logs")]
        info!("Using completion prompt:\n{}", prompt);

        info!(
            model = %self.model_name,
            estimated_input_tokens = estimate_tokens(prompt),
            "Requesting completion"
        );

        let request = self.build_request(prompt);
        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            warn!(status = %status, body = %error_text, "Completion endpoint returned an error");
            return Err(parse_api_error(status.as_u16(), &error_text));
        }

        let body: ChatCompletionBody = response.json().await.map_err(|e| {
            CompletionError::Transport(format!("Failed to parse completion response: {e}"))
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        debug!(chars = text.chars().count(), "Completion received");
        Ok(text)
    }
}

/// Maps an error response to [`CompletionError::Api`], preferring the code and message from
/// the `{"error": {...}}` envelope and falling back to the HTTP status and raw body.
#[must_use]
pub fn parse_api_error(status: u16, body: &str) -> CompletionError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let code = envelope
        .as_ref()
        .and_then(|e| e.error.code.as_ref())
        .and_then(|c| match c {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| status.to_string());
    let message = envelope
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    CompletionError::Api { code, message }
}
