//! Document payload encoding and generation parameters

use crate::media::MediaType;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// An inline document ready to be attached to a provider request:
/// base64-encoded bytes plus the resolved media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    /// Resolved media type
    pub media_type: MediaType,
    /// Base64-encoded document bytes
    pub data: String,
}

impl DocumentPayload {
    /// Encode raw document bytes.
    pub fn new(bytes: &[u8], media_type: MediaType) -> Self {
        Self {
            media_type,
            data: BASE64.encode(bytes),
        }
    }
}

/// Sampling parameters for a generation call.
///
/// Call sites vary only the temperature: document extraction runs at 0.1
/// for precision, chat-style calls at 0.2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens in the answer
    pub max_output_tokens: u32,
    /// Nucleus sampling threshold
    pub top_p: f32,
    /// Top-k sampling cutoff
    pub top_k: u32,
}

impl GenerationParams {
    /// Strict preset for document extraction (temperature 0.1).
    pub fn strict() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 8192,
            top_p: 0.95,
            top_k: 40,
        }
    }

    /// Chat preset (temperature 0.2).
    pub fn chat() -> Self {
        Self {
            temperature: 0.2,
            ..Self::strict()
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::chat()
    }
}
