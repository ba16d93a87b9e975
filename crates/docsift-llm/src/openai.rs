//! OpenAI Provider Client
//!
//! Direct HTTP client for the chat completions API. The API key travels as
//! a bearer header; the answer text lives at `choices[0].message.content`.

use crate::payload::GenerationParams;
use crate::{provider_error_message, LlmError, Provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// HTTP client for OpenAI chat completions.
pub struct OpenAiClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a client against the production endpoint.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Call chat completions and return the model's answer text.
    ///
    /// An optional system message precedes the user prompt. `timeout`
    /// distinguishes chat calls from slower document calls.
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        system: Option<&str>,
        params: &GenerationParams,
        timeout: Duration,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage { role: "system", content: system });
        }
        messages.push(ChatMessage { role: "user", content: prompt });

        let body = ChatCompletionRequest {
            model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
        };

        debug!(model, "calling OpenAI chat completions");

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(Provider::OpenAi)
                } else {
                    LlmError::Transport {
                        provider: Provider::OpenAi,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                provider: Provider::OpenAi,
                status: status.as_u16(),
                message: provider_error_message(&raw),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            LlmError::Transport {
                provider: Provider::OpenAi,
                message: format!("failed to read response body: {}", e),
            }
        })?;

        extract_answer(parsed).ok_or(LlmError::EmptyResponse(Provider::OpenAi))
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_answer(response: ChatCompletionResponse) -> Option<String> {
    response.choices.into_iter().next()?.message?.content
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-4",
            messages: vec![
                ChatMessage { role: "system", content: "be precise" },
                ChatMessage { role: "user", content: "extract" },
            ],
            temperature: 0.2,
            max_tokens: 8192,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "extract");
        assert_eq!(json["max_tokens"], 8192);
    }

    #[test]
    fn test_answer_extraction() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"answer"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_answer(response).unwrap(), "answer");
    }

    #[test]
    fn test_answer_extraction_missing_path() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(extract_answer(empty).is_none());
    }

    #[tokio::test]
    async fn test_transport_error_on_unreachable_endpoint() {
        let client = OpenAiClient::with_base_url("http://127.0.0.1:1");
        let result = client
            .generate(
                "key",
                "gpt-4",
                "hi",
                None,
                &GenerationParams::chat(),
                Duration::from_secs(1),
            )
            .await;
        assert!(matches!(
            result,
            Err(LlmError::Transport { provider: Provider::OpenAi, .. })
        ));
    }
}
