//! Provider selection
//!
//! A model identifier maps to exactly one vendor via a static prefix table.
//! The provider determines transport shape (auth, URL, answer path); the
//! payload shape is decided by the caller.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vendor LLM HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Generative Language API (Gemini models)
    Google,
    /// OpenAI chat completions API (GPT models)
    OpenAi,
}

impl Provider {
    /// Resolve the provider for a model identifier.
    ///
    /// `gemini*` models belong to Google, `gpt-*` models to OpenAI; anything
    /// else fails with [`LlmError::UnknownProvider`].
    pub fn for_model(model: &str) -> Result<Provider, LlmError> {
        let lower = model.to_ascii_lowercase();
        if lower.starts_with("gemini") {
            Ok(Provider::Google)
        } else if lower.starts_with("gpt-") {
            Ok(Provider::OpenAi)
        } else {
            Err(LlmError::UnknownProvider(model.to_string()))
        }
    }

    /// Configuration key under which this provider's API key is stored.
    pub fn secret_key(&self) -> &'static str {
        match self {
            Provider::Google => "ai.google_key",
            Provider::OpenAi => "ai.openai_key",
        }
    }

    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
        }
    }

    /// Vendor name for user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Google => "Google AI",
            Provider::OpenAi => "OpenAI",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_models_map_to_google() {
        assert_eq!(Provider::for_model("gemini-2.0-flash").unwrap(), Provider::Google);
        assert_eq!(Provider::for_model("gemini-1.5-pro").unwrap(), Provider::Google);
        assert_eq!(Provider::for_model("Gemini-1.5-Flash").unwrap(), Provider::Google);
    }

    #[test]
    fn test_gpt_models_map_to_openai() {
        assert_eq!(Provider::for_model("gpt-4").unwrap(), Provider::OpenAi);
        assert_eq!(Provider::for_model("gpt-3.5-turbo").unwrap(), Provider::OpenAi);
    }

    #[test]
    fn test_unknown_model_fails() {
        let err = Provider::for_model("claude-3").unwrap_err();
        assert!(matches!(err, LlmError::UnknownProvider(m) if m == "claude-3"));
    }

    #[test]
    fn test_secret_keys_are_provider_scoped() {
        assert_eq!(Provider::Google.secret_key(), "ai.google_key");
        assert_eq!(Provider::OpenAi.secret_key(), "ai.openai_key");
        assert_ne!(Provider::Google.secret_key(), Provider::OpenAi.secret_key());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Provider::Google.to_string(), "Google AI");
        assert_eq!(Provider::OpenAi.as_str(), "openai");
    }
}
