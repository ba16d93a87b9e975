//! Backend strategy
//!
//! The extraction pipeline talks to "an LLM" through the [`LlmBackend`]
//! trait and never chooses a transport at runtime. Two implementations
//! ship here:
//!
//! - [`DirectHttpBackend`]: resolves the provider from the model name and
//!   calls the vendor HTTP API directly
//! - [`PlatformBackend`]: delegates to an injected platform chat service,
//!   opening a scratch session per call and releasing it unconditionally
//!
//! Selection happens by dependency injection at startup.

use crate::gemini::{GeminiClient, CHAT_TIMEOUT_SECS, DOCUMENT_TIMEOUT_SECS};
use crate::openai::OpenAiClient;
use crate::payload::{DocumentPayload, GenerationParams};
use crate::{LlmError, Provider};
use docsift_domain::SecretProvider;
use std::time::Duration;
use tracing::warn;

/// One generation call: model, prompt, optional inline document.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Model identifier (also selects the provider)
    pub model: String,
    /// Full prompt text
    pub prompt: String,
    /// Optional system context (chat-shaped providers only)
    pub system: Option<String>,
    /// Optional inline document payload
    pub document: Option<DocumentPayload>,
    /// Sampling parameters
    pub params: GenerationParams,
}

impl LlmRequest {
    /// A text-only request with chat parameters.
    pub fn chat(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            document: None,
            params: GenerationParams::chat(),
        }
    }

    /// A document request with strict extraction parameters.
    pub fn document(
        model: impl Into<String>,
        prompt: impl Into<String>,
        document: DocumentPayload,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            document: Some(document),
            params: GenerationParams::strict(),
        }
    }
}

/// Strategy seam between the orchestrator and a model transport.
pub trait LlmBackend {
    /// Execute one generation call and return the raw answer text.
    fn generate(
        &self,
        request: &LlmRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}

/// Backend that calls the vendor HTTP APIs directly.
///
/// The API key is looked up from the injected [`SecretProvider`] before
/// any network I/O; a missing key fails fast with
/// [`LlmError::MissingCredential`].
pub struct DirectHttpBackend<S> {
    secrets: S,
    gemini: GeminiClient,
    openai: OpenAiClient,
}

impl<S: SecretProvider + Sync> DirectHttpBackend<S> {
    /// Create a backend against the production endpoints.
    pub fn new(secrets: S) -> Self {
        Self {
            secrets,
            gemini: GeminiClient::new(),
            openai: OpenAiClient::new(),
        }
    }

    /// Replace the Gemini client (tests, custom endpoint or API version).
    pub fn with_gemini(mut self, client: GeminiClient) -> Self {
        self.gemini = client;
        self
    }

    /// Replace the OpenAI client (tests, custom endpoint).
    pub fn with_openai(mut self, client: OpenAiClient) -> Self {
        self.openai = client;
        self
    }
}

impl<S: SecretProvider + Sync> LlmBackend for DirectHttpBackend<S> {
    async fn generate(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let provider = Provider::for_model(&request.model)?;
        let api_key = self
            .secrets
            .get_secret(provider.secret_key())
            .ok_or(LlmError::MissingCredential(provider))?;

        match provider {
            Provider::Google => {
                self.gemini
                    .generate(
                        &api_key,
                        &request.model,
                        &request.prompt,
                        request.document.as_ref(),
                        &request.params,
                    )
                    .await
            }
            Provider::OpenAi => {
                // Chat completions carry no inline binary part; document
                // content must already be inlined as text in the prompt.
                if request.document.is_some() {
                    warn!(
                        model = %request.model,
                        "inline document payload is not supported by the OpenAI transport; sending prompt only"
                    );
                }
                let timeout = if request.document.is_some() {
                    Duration::from_secs(DOCUMENT_TIMEOUT_SECS)
                } else {
                    Duration::from_secs(CHAT_TIMEOUT_SECS)
                };
                self.openai
                    .generate(
                        &api_key,
                        &request.model,
                        &request.prompt,
                        request.system.as_deref(),
                        &request.params,
                        timeout,
                    )
                    .await
            }
        }
    }
}

/// A platform-managed chat service (the enterprise alternative to direct
/// HTTP). Sessions are scratch resources created for one call.
pub trait ChatService {
    /// Session handle type
    type Session: Send;
    /// Error type for service operations
    type Error: std::fmt::Display;

    /// Open a scratch session.
    fn open_session(
        &self,
    ) -> impl std::future::Future<Output = Result<Self::Session, Self::Error>> + Send;

    /// Run one completion inside a session.
    fn complete(
        &self,
        session: &Self::Session,
        request: &LlmRequest,
    ) -> impl std::future::Future<Output = Result<String, Self::Error>> + Send;

    /// Release a session.
    fn close_session(
        &self,
        session: Self::Session,
    ) -> impl std::future::Future<Output = Result<(), Self::Error>> + Send;
}

/// Backend that delegates to an injected [`ChatService`].
///
/// The scratch session is released unconditionally after the call; a
/// release failure is logged and never fails the extraction.
pub struct PlatformBackend<C> {
    service: C,
}

impl<C: ChatService + Sync> PlatformBackend<C> {
    /// Wrap a platform chat service.
    pub fn new(service: C) -> Self {
        Self { service }
    }
}

impl<C: ChatService + Sync> LlmBackend for PlatformBackend<C> {
    async fn generate(&self, request: &LlmRequest) -> Result<String, LlmError> {
        let session = self
            .service
            .open_session()
            .await
            .map_err(|e| LlmError::Platform(e.to_string()))?;

        let result = self
            .service
            .complete(&session, request)
            .await
            .map_err(|e| LlmError::Platform(e.to_string()));

        if let Err(e) = self.service.close_session(session).await {
            warn!("failed to release platform chat session: {}", e);
        }

        result
    }
}
