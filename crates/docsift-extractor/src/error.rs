//! Error types for the extraction pipeline

use docsift_domain::StateError;
use docsift_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while orchestrating an extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No attachments on the triggering record
    #[error("No attachments found to extract data from.")]
    NoAttachments,

    /// No agent or template selected
    #[error("Please select an AI agent first.")]
    NoAgentSelected,

    /// Attachment bytes could not be read or decoded
    #[error("could not read attachment '{name}': {reason}")]
    AttachmentRead {
        /// Attachment filename
        name: String,
        /// Underlying failure
        reason: String,
    },

    /// Provider-layer failure
    #[error(transparent)]
    Llm(#[from] LlmError),

    /// Illegal extraction state transition
    #[error(transparent)]
    State(#[from] StateError),
}

impl ExtractError {
    /// Whether this error aborts the whole run.
    ///
    /// Credential, provider, media-type, and precondition errors surface
    /// verbatim and stop the run; everything else is captured per
    /// attachment and never aborts siblings.
    pub fn is_fatal(&self) -> bool {
        match self {
            ExtractError::NoAttachments
            | ExtractError::NoAgentSelected
            | ExtractError::State(_) => true,
            ExtractError::Llm(
                LlmError::MissingCredential(_)
                | LlmError::UnknownProvider(_)
                | LlmError::UnsupportedMediaType(_),
            ) => true,
            ExtractError::Llm(_) | ExtractError::AttachmentRead { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsift_llm::Provider;

    #[test]
    fn test_fatal_errors() {
        assert!(ExtractError::NoAttachments.is_fatal());
        assert!(ExtractError::NoAgentSelected.is_fatal());
        assert!(ExtractError::Llm(LlmError::MissingCredential(Provider::Google)).is_fatal());
        assert!(ExtractError::Llm(LlmError::UnknownProvider("x".into())).is_fatal());
        assert!(ExtractError::Llm(LlmError::UnsupportedMediaType("video/mp4".into())).is_fatal());
    }

    #[test]
    fn test_per_attachment_errors() {
        assert!(!ExtractError::Llm(LlmError::Timeout(Provider::Google)).is_fatal());
        assert!(!ExtractError::Llm(LlmError::EmptyResponse(Provider::OpenAi)).is_fatal());
        assert!(!ExtractError::AttachmentRead {
            name: "a.pdf".into(),
            reason: "truncated".into()
        }
        .is_fatal());
    }
}
