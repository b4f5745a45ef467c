//! Completion generator collaborator
//!
//! Chat-completion interface used for reply generation and for LLM-backed
//! slot extraction in the booking dialog. The error type keeps rate-limit,
//! timeout and API failures distinct so the orchestrator can map each to its
//! own canned fallback reply.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Failure modes the orchestrator handles individually.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("completion rate limit reached")]
    RateLimited,

    #[error("completion request timed out")]
    Timeout,

    #[error("completion API error: {0}")]
    Api(String),

    #[error("completion failed: {0}")]
    Other(String),
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Generate a reply from a system prompt (persona + context block) and
    /// the user's text.
    async fn generate(&self, system_prompt: &str, user_text: &str)
        -> Result<String, CompletionError>;

    /// Model identifier for logging.
    fn model_name(&self) -> &str;
}

const DEFAULT_MAX_TOKENS: u32 = 300;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// OpenAI-style chat completions client.
#[derive(Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, base_url: String, model: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn generate(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "model": &self.model,
                "max_tokens": DEFAULT_MAX_TOKENS,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_text}
                ]
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::Other(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CompletionError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(format!("{status}: {body}")));
        }

        #[derive(Deserialize)]
        struct Message {
            content: Option<String>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: Message,
        }
        #[derive(Deserialize)]
        struct ApiResponse {
            choices: Vec<Choice>,
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Api(e.to_string()))?;

        api_response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| CompletionError::Api("empty completion response".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let client = OpenAiClient::new(
            "test-key".into(),
            "https://api.openai.com/v1".into(),
            "gpt-3.5-turbo".into(),
        )
        .unwrap();
        assert_eq!(client.model_name(), "gpt-3.5-turbo");
    }
}
