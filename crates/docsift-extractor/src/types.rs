//! Configuration records and result types for extraction

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Document classification selecting a predefined prompt template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// General document extraction
    General,
    /// Handwritten text recognition
    Handwritten,
    /// Invoice / receipt processing
    Invoice,
    /// Form data extraction
    Form,
}

impl Default for DocumentType {
    fn default() -> Self {
        DocumentType::General
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DocumentType::General => "general",
            DocumentType::Handwritten => "handwritten",
            DocumentType::Invoice => "invoice",
            DocumentType::Form => "form",
        };
        f.write_str(name)
    }
}

/// How a mapped field relates to the target model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Plain scalar field
    Simple,
    /// Reference to another record
    Relational,
    /// Informational only, not written to the target model
    Extra,
}

impl Default for FieldKind {
    fn default() -> Self {
        FieldKind::Simple
    }
}

/// One rule translating a JSON key in the parsed result into a target field.
///
/// `target_field` may be absent only for informational mappings; such
/// entries still contribute a prompt hint but are a no-op on record
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Key expected in the extracted JSON
    pub label: String,
    /// Field name on the target model
    #[serde(default)]
    pub target_field: Option<String>,
    /// Field kind
    #[serde(default)]
    pub kind: FieldKind,
    /// Example value appended to the prompt hint
    #[serde(default)]
    pub example: Option<String>,
    /// Static fallback when the key is absent from the extraction
    #[serde(default)]
    pub default_value: Option<String>,
}

/// A named extraction template: target model, prompt strategy, vendor model,
/// and field mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    /// Template name
    pub name: String,
    /// Model name in the record store that mapped records are created in
    pub target_model: String,
    /// Document classification selecting the predefined prompt
    #[serde(default)]
    pub document_type: DocumentType,
    /// Vendor model identifier (selects the provider)
    pub model: String,
    /// Custom prompt; takes precedence over the predefined template when
    /// non-empty
    #[serde(default)]
    pub custom_prompt: Option<String>,
    /// Ordered field mappings
    #[serde(default)]
    pub mappings: Vec<FieldMapping>,
}

impl Template {
    /// Mappings that resolve to a target field, in order.
    pub fn writable_mappings(&self) -> impl Iterator<Item = &FieldMapping> {
        self.mappings.iter().filter(|m| m.target_field.is_some())
    }
}

/// An AI agent configuration for the agent-mode flow (no field mappings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Agent name (reported in the extraction result)
    pub name: String,
    /// Vendor model identifier
    pub model: String,
    /// Whether the agent is flagged as a document-extraction specialist
    #[serde(default)]
    pub document_extraction: bool,
    /// The agent's own system prompt, if any
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Outcome of parsing one provider answer. A parse failure degrades to
/// `Raw`, never to an error.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// The answer contained valid JSON
    Json(Value),
    /// No valid JSON found; raw text plus a note on what went wrong
    Raw {
        /// The unmodified answer text
        text: String,
        /// Why parsing degraded
        note: String,
    },
}

impl ParsedResponse {
    /// The JSON value when parsing succeeded.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParsedResponse::Json(value) => Some(value),
            ParsedResponse::Raw { .. } => None,
        }
    }

    /// Convert to a JSON value for storage; raw text becomes
    /// `{"ai_response": ..., "parsing_note": ...}`.
    pub fn into_value(self) -> Value {
        match self {
            ParsedResponse::Json(value) => value,
            ParsedResponse::Raw { text, note } => json!({
                "ai_response": text,
                "parsing_note": note,
            }),
        }
    }
}

/// Result of extracting one attachment, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentResult {
    /// Attachment filename
    pub attachment_name: String,
    /// Blob-store id of the attachment
    pub attachment_id: u64,
    /// Parsed extraction result (absent on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
    /// Error text (absent on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// When this attachment was processed (RFC 3339)
    pub timestamp: String,
}

impl AttachmentResult {
    /// Build a success entry.
    pub fn success(name: impl Into<String>, id: u64, data: Value, timestamp: String) -> Self {
        Self {
            attachment_name: name.into(),
            attachment_id: id,
            extracted_data: Some(data),
            error: None,
            timestamp,
        }
    }

    /// Build a failure entry.
    pub fn failure(name: impl Into<String>, id: u64, error: impl Into<String>, timestamp: String) -> Self {
        Self {
            attachment_name: name.into(),
            attachment_id: id,
            extracted_data: None,
            error: Some(error.into()),
            timestamp,
        }
    }

    /// Whether this entry records a failure.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Coarse status of an aggregate result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// The result list is non-empty (individual entries may still be errors)
    Success,
    /// Nothing was processed
    NoResults,
}

/// Aggregate result of one extraction run, stored on the triggering record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// When the run finished (RFC 3339)
    pub extraction_timestamp: String,
    /// Name of the agent or template used
    pub agent_name: String,
    /// Vendor model identifier used
    pub model: String,
    /// Ordered per-attachment results
    pub results: Vec<AttachmentResult>,
    /// Coarse status
    pub status: ReportStatus,
    /// Human-readable summary
    pub message: String,
}

impl ExtractionReport {
    /// Whether every entry failed (false for an empty list).
    pub fn all_failed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.is_error())
    }

    /// Pretty-printed JSON for storage on the triggering record.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
