//! docsift LLM Provider Layer
//!
//! Clients for the vendor LLM HTTP APIs and the backend strategy seam.
//!
//! # Architecture
//!
//! A model identifier selects exactly one provider (static table in
//! [`Provider`]); the provider determines the transport shape (auth
//! placement, URL, answer path) while the payload shape is decided by the
//! caller. The extraction pipeline talks to all of this only through the
//! [`LlmBackend`] trait.
//!
//! # Backends
//!
//! - [`DirectHttpBackend`]: direct Gemini / OpenAI HTTP calls
//! - [`PlatformBackend`]: delegates to an injected platform chat service
//! - [`MockBackend`]: deterministic mock for testing
//!
//! # Examples
//!
//! ```
//! use docsift_llm::{LlmBackend, LlmRequest, MockBackend};
//!
//! # tokio_test::block_on(async {
//! let backend = MockBackend::new("{\"total\": 42}");
//! let answer = backend.generate(&LlmRequest::chat("gemini-2.0-flash", "extract")).await.unwrap();
//! assert_eq!(answer, "{\"total\": 42}");
//! # });
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod gemini;
pub mod media;
pub mod openai;
pub mod payload;
pub mod provider;

use serde::Deserialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use backend::{ChatService, DirectHttpBackend, LlmBackend, LlmRequest, PlatformBackend};
pub use gemini::{ApiVersion, GeminiClient, CHAT_TIMEOUT_SECS, DOCUMENT_TIMEOUT_SECS};
pub use media::MediaType;
pub use openai::OpenAiClient;
pub use payload::{DocumentPayload, GenerationParams};
pub use provider::Provider;

/// Errors that can occur while talking to an LLM provider.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key configured for the provider
    #[error("{} API key not configured. Please set '{}' in the secret store.", .0, .0.secret_key())]
    MissingCredential(Provider),

    /// Model identifier not present in the provider table
    #[error("no provider found for model: {0}")]
    UnknownProvider(String),

    /// Declared media type outside the supported set
    #[error("unsupported file type: {0}")]
    UnsupportedMediaType(String),

    /// The call exceeded its deadline; retry with a smaller document
    #[error("{0} API timeout - document processing took too long. Try with a smaller file.")]
    Timeout(Provider),

    /// Non-2xx response from the provider
    #[error("{provider} API error (HTTP {status}): {message}")]
    Http {
        /// Provider that answered
        provider: Provider,
        /// HTTP status code
        status: u16,
        /// Provider's structured error message, or the raw body
        message: String,
    },

    /// 2xx response without the expected answer path
    #[error("invalid response from {0} API")]
    EmptyResponse(Provider),

    /// Connection-level failure before an HTTP status was received
    #[error("request to {provider} failed: {message}")]
    Transport {
        /// Provider being called
        provider: Provider,
        /// Underlying error text
        message: String,
    },

    /// Failure inside a platform chat service
    #[error("platform service error: {0}")]
    Platform(String),
}

/// Both vendors wrap errors as `{"error": {"message": ...}}`.
#[derive(Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderErrorDetail>,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
}

/// Extract the provider's structured error message from a non-2xx body,
/// falling back to the raw body when it does not parse.
pub(crate) fn provider_error_message(raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ProviderErrorBody>(raw) {
        if let Some(message) = body.error.and_then(|e| e.message) {
            return message;
        }
    }
    raw.to_string()
}

/// Deterministic backend for testing.
///
/// Returns queued responses in order, then a fixed default. Tracks how many
/// calls were made so tests can assert that no call happened (or how many
/// did).
///
/// # Examples
///
/// ```
/// use docsift_llm::{LlmBackend, LlmRequest, MockBackend};
///
/// # tokio_test::block_on(async {
/// let backend = MockBackend::new("default");
/// backend.push_response("first");
/// assert_eq!(backend.generate(&LlmRequest::chat("gpt-4", "a")).await.unwrap(), "first");
/// assert_eq!(backend.generate(&LlmRequest::chat("gpt-4", "b")).await.unwrap(), "default");
/// assert_eq!(backend.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockBackend {
    default_response: String,
    queue: Arc<Mutex<VecDeque<Result<String, LlmError>>>>,
    call_count: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<LlmRequest>>>,
}

impl MockBackend {
    /// Create a mock with a fixed default response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Queue a response for the next call.
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue.lock().unwrap().push_back(Ok(response.into()));
    }

    /// Queue a failure for the next call.
    pub fn push_error(&self, error: LlmError) {
        self.queue.lock().unwrap().push_back(Err(error));
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent request, for asserting on prompt content.
    pub fn last_request(&self) -> Option<LlmRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmBackend for MockBackend {
    async fn generate(&self, request: &LlmRequest) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        match self.queue.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Ok(self.default_response.clone()),
        }
    }
}
