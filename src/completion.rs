//! Completion-service client.
//!
//! Speaks the OpenAI-compatible chat-completions wire contract: a POST to
//! `/v1/chat/completions` carrying the model name, the ordered turn list
//! from the context builder, and the sampling parameters. The success path
//! reads `choices[0].message.content`; an empty `choices` list is a
//! failure.
//!
//! There is deliberately NO retry loop here. Every failure (transport,
//! non-success status, malformed body, no choices) surfaces as a single
//! [`Error::Completion`] value and the caller decides whether to try again.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::CompletionConfig;
use crate::error::Error;
use crate::models::ChatTurn;

/// Environment variable holding the bearer credential. Checked by the
/// caller before any context is built.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Request body for `POST /v1/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatTurn>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Response body. `usage` is optional in the wire contract; the rest of
/// the fields are carried in full even where this client only reads the
/// first choice's content.
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChatTurn,
    pub finish_reason: String,
}

#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// The configured API key, if present and non-empty.
pub fn api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Submit one completion request and return the generated reply text.
pub async fn request_reply(
    config: &CompletionConfig,
    api_key: &str,
    messages: Vec<ChatTurn>,
) -> Result<String, Error> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| Error::Completion(format!("failed to build HTTP client: {e}")))?;

    let request = ChatRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let endpoint = format!(
        "{}/v1/chat/completions",
        config.base_url.trim_end_matches('/')
    );

    let response = client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {api_key}"))
        .json(&request)
        .send()
        .await
        .map_err(|e| Error::Completion(format!("network error: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Completion(format!(
            "completion API error {status}: {body}"
        )));
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|e| Error::Completion(format!("malformed completion response: {e}")))?;

    first_choice_text(parsed)
}

/// Extract the reply from a parsed response.
fn first_choice_text(response: ChatResponse) -> Result<String, Error> {
    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| Error::Completion("response contained no choices".to_string()))
}
