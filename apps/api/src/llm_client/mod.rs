//! Anthropic Messages API client used by the generative suggestion provider.
//!
//! Every `call` runs against a single time budget. Attempts share what is left
//! of it, and a retry is only scheduled when its backoff still fits, so the
//! caller's own timeout never cuts a backoff sleep short.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 1024;
const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("time budget of {budget:?} exhausted after {attempts} attempt(s)")]
    BudgetExhausted { budget: Duration, attempts: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
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

/// Outcome of one HTTP attempt.
enum AttemptError {
    Retryable(LlmError),
    Fatal(LlmError),
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    budget: Duration,
}

impl LlmClient {
    /// `budget` bounds a whole `call`, retries and backoff included.
    pub fn new(api_key: String, budget: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().build()?,
            api_key,
            budget,
        })
    }

    /// Calls the model and deserializes its text reply as JSON.
    /// The prompt must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        system: &str,
    ) -> Result<T, LlmError> {
        let response = self.call(prompt, system).await?;
        let text = response.first_text().ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(text)).map_err(LlmError::Parse)
    }

    async fn call(&self, prompt: &str, system: &str) -> Result<MessagesResponse, LlmError> {
        let body = MessagesRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        let deadline = Instant::now() + self.budget;
        let mut last_error = None;
        let mut attempts = 0;

        while attempts < MAX_ATTEMPTS {
            if attempts > 0 {
                let delay = backoff_delay(attempts);
                if deadline.saturating_duration_since(Instant::now()) <= delay {
                    break;
                }
                warn!("LLM attempt {attempts} failed, retrying in {}ms", delay.as_millis());
                tokio::time::sleep(delay).await;
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            let timeout = attempt_timeout(remaining, MAX_ATTEMPTS - attempts);
            attempts += 1;

            match self.attempt(&body, timeout).await {
                Ok(response) => return Ok(response),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or(LlmError::BudgetExhausted {
            budget: self.budget,
            attempts,
        }))
    }

    async fn attempt(
        &self,
        body: &MessagesRequest<'_>,
        timeout: Duration,
    ) -> Result<MessagesResponse, AttemptError> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .timeout(timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(LlmError::Http(e)))?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let error = LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(raw),
            };
            return Err(if is_retryable(status) {
                warn!("LLM API returned {status}");
                AttemptError::Retryable(error)
            } else {
                AttemptError::Fatal(error)
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(LlmError::Http(e)))?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            parsed.usage.input_tokens, parsed.usage.output_tokens
        );
        Ok(parsed)
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// 250ms, 500ms, 1s, ... before attempt `n` (1-based retries).
fn backoff_delay(retry: u32) -> Duration {
    BASE_BACKOFF * (1 << (retry - 1))
}

/// Even share of the remaining budget for this and every later attempt.
fn attempt_timeout(remaining: Duration, attempts_left: u32) -> Duration {
    remaining / attempts_left.max(1)
}

fn api_error_message(raw: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&raw)
        .map(|e| e.error.message)
        .unwrap_or(raw)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n[\"Add Kafka projects\"]\n```";
        assert_eq!(strip_json_fences(input), "[\"Add Kafka projects\"]");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n[\"a\", \"b\"]\n```";
        assert_eq!(strip_json_fences(input), "[\"a\", \"b\"]");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  [\"a\"]  ";
        assert_eq!(strip_json_fences(input), "[\"a\"]");
    }

    #[test]
    fn test_first_text_skips_non_text_blocks() {
        let json = r#"{
            "content": [
                {"type": "tool_use"},
                {"type": "text", "text": "[\"one\"]"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 3}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.first_text(), Some("[\"one\"]"));
    }

    #[test]
    fn test_retry_only_on_rate_limit_and_server_errors() {
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(!is_retryable(StatusCode::BAD_REQUEST));
        assert!(!is_retryable(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn test_attempts_share_the_budget() {
        let budget = Duration::from_secs(20);
        let first = attempt_timeout(budget, MAX_ATTEMPTS);
        assert!(first * MAX_ATTEMPTS <= budget);
        assert!(first < budget);

        // The last attempt gets whatever is left.
        assert_eq!(attempt_timeout(Duration::from_secs(4), 1), Duration::from_secs(4));
        assert_eq!(attempt_timeout(Duration::from_secs(4), 0), Duration::from_secs(4));
    }

    #[test]
    fn test_backoff_fits_inside_default_budget() {
        let total_backoff: Duration = (1..MAX_ATTEMPTS).map(backoff_delay).sum();
        assert_eq!(backoff_delay(1), Duration::from_millis(250));
        assert_eq!(backoff_delay(2), Duration::from_millis(500));
        assert!(total_backoff < Duration::from_secs(20));
    }

    #[test]
    fn test_api_error_message_unwraps_envelope() {
        let raw = r#"{"type":"error","error":{"type":"invalid_request_error","message":"bad model"}}"#;
        assert_eq!(api_error_message(raw.to_string()), "bad model");
        assert_eq!(api_error_message("upstream down".to_string()), "upstream down");
    }

    #[test]
    fn test_client_builds() {
        assert!(LlmClient::new("test-key".to_string(), Duration::from_secs(5)).is_ok());
    }
}
