//! Gemini Provider Client
//!
//! Direct HTTP client for the Google Generative Language API. The API key
//! travels as a query parameter; the answer text lives at
//! `candidates[0].content.parts[0].text`.
//!
//! Document calls carry one text part (the prompt) and one inline-data part
//! (media type + base64 bytes) and get a longer timeout, since documents
//! are slower to process than chat turns.

use crate::payload::{DocumentPayload, GenerationParams};
use crate::{provider_error_message, LlmError, Provider};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default Gemini API endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Timeout for chat-style calls (seconds)
pub const CHAT_TIMEOUT_SECS: u64 = 45;

/// Timeout for document calls (seconds)
pub const DOCUMENT_TIMEOUT_SECS: u64 = 90;

/// Generative Language API version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// Stable `v1`
    V1,
    /// `v1beta`, required by the newest models
    V1Beta,
}

impl ApiVersion {
    /// URL path segment for this version.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V1Beta => "v1beta",
        }
    }
}

/// HTTP client for Gemini `generateContent` calls.
pub struct GeminiClient {
    base_url: String,
    version: ApiVersion,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'static str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "topP")]
    top_p: f32,
    #[serde(rename = "topK")]
    top_k: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client against the production endpoint, `v1beta`.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client against a custom endpoint (tests, proxies).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            version: ApiVersion::V1Beta,
            client: reqwest::Client::new(),
        }
    }

    /// Select the API version.
    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    fn url(&self, model: &str, api_key: &str) -> String {
        format!(
            "{}/{}/models/{}:generateContent?key={}",
            self.base_url,
            self.version.as_str(),
            model,
            api_key
        )
    }

    /// Call `generateContent` and return the model's answer text.
    ///
    /// A `document` payload switches the request to the longer document
    /// timeout.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Timeout`] when the call exceeds its deadline
    /// - [`LlmError::Http`] on non-2xx, carrying the provider's structured
    ///   error message when the body parses, the raw body otherwise
    /// - [`LlmError::EmptyResponse`] when the answer path is absent
    pub async fn generate(
        &self,
        api_key: &str,
        model: &str,
        prompt: &str,
        document: Option<&DocumentPayload>,
        params: &GenerationParams,
    ) -> Result<String, LlmError> {
        let mut parts = vec![Part::Text { text: prompt }];
        if let Some(doc) = document {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: doc.media_type.as_str(),
                    data: &doc.data,
                },
            });
        }

        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
                top_p: params.top_p,
                top_k: params.top_k,
            },
        };

        let timeout = if document.is_some() {
            Duration::from_secs(DOCUMENT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(CHAT_TIMEOUT_SECS)
        };

        debug!(model, document = document.is_some(), "calling Gemini generateContent");

        let response = self
            .client
            .post(self.url(model, api_key))
            .timeout(timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(Provider::Google)
                } else {
                    LlmError::Transport {
                        provider: Provider::Google,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                provider: Provider::Google,
                status: status.as_u16(),
                message: provider_error_message(&raw),
            });
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Transport {
                provider: Provider::Google,
                message: format!("failed to read response body: {}", e),
            }
        })?;

        extract_answer(parsed).ok_or(LlmError::EmptyResponse(Provider::Google))
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Pull the answer text out of a `generateContent` response.
fn extract_answer(response: GenerateContentResponse) -> Option<String> {
    response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .find_map(|part| part.text)
}
