//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the extraction pipeline and
//! infrastructure. Implementations live in other crates (`docsift-store`
//! provides in-memory registry stores, applications bring their own).

use crate::attachment::Attachment;
use crate::record::{FieldValues, RecordId};
use crate::state::ExtractState;

/// Opaque key-value record store, addressed by model name and id.
///
/// Model names are opaque string keys; dispatch is registry-based, never
/// reflective.
pub trait RecordStore {
    /// Error type for store operations
    type Error: std::fmt::Display;

    /// Fetch a record's field values, `None` if it does not exist.
    fn get(&self, model: &str, id: RecordId) -> Result<Option<FieldValues>, Self::Error>;

    /// Create a new record and return its id.
    fn create(&mut self, model: &str, values: FieldValues) -> Result<RecordId, Self::Error>;
}

/// Blob store holding attachments keyed by (model, record id).
pub trait BlobStore {
    /// Error type for blob operations
    type Error: std::fmt::Display;

    /// Attachments of a record, in storage order.
    fn list_attachments(&self, model: &str, id: RecordId) -> Result<Vec<Attachment>, Self::Error>;
}

/// External key-value configuration provider for API credentials.
pub trait SecretProvider {
    /// Look up a secret by key, `None` when unset.
    fn get_secret(&self, key: &str) -> Option<String>;
}

/// Capability a business-record type opts into to host extractions.
///
/// The host record exclusively owns its extraction state, last JSON payload,
/// and last error message; each run overwrites them, never appends.
pub trait ExtractionCapable {
    /// Current extraction state.
    fn extract_state(&self) -> ExtractState;

    /// Overwrite the extraction state.
    fn set_extract_state(&mut self, state: ExtractState);

    /// Overwrite the stored extraction JSON (`None` clears it).
    fn set_extract_json(&mut self, json: Option<String>);

    /// Overwrite the stored error message (`None` clears it).
    fn set_extract_error(&mut self, error: Option<String>);

    /// Name of the agent selected for this record, if any.
    fn agent_name(&self) -> Option<&str>;

    /// Select an agent for this record.
    fn set_agent_name(&mut self, agent: Option<String>);
}

/// Ready-made field bundle implementing [`ExtractionCapable`].
///
/// Embed this in a record type (or use it standalone in tests and tools)
/// instead of re-implementing the setters.
#[derive(Debug, Clone, Default)]
pub struct ExtractionFields {
    /// Current extraction state
    pub state: ExtractState,
    /// Last extraction result as pretty-printed JSON
    pub json: Option<String>,
    /// Last extraction error message
    pub error: Option<String>,
    /// Selected agent name
    pub agent: Option<String>,
}

impl ExtractionCapable for ExtractionFields {
    fn extract_state(&self) -> ExtractState {
        self.state
    }

    fn set_extract_state(&mut self, state: ExtractState) {
        self.state = state;
    }

    fn set_extract_json(&mut self, json: Option<String>) {
        self.json = json;
    }

    fn set_extract_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    fn agent_name(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    fn set_agent_name(&mut self, agent: Option<String>) {
        self.agent = agent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_fields_default() {
        let fields = ExtractionFields::default();
        assert_eq!(fields.extract_state(), ExtractState::NoExtract);
        assert!(fields.json.is_none());
        assert!(fields.error.is_none());
        assert!(fields.agent_name().is_none());
    }

    #[test]
    fn test_extraction_fields_overwrite() {
        let mut fields = ExtractionFields::default();
        fields.set_extract_state(ExtractState::Processing);
        fields.set_extract_json(Some("{}".to_string()));
        fields.set_extract_error(Some("boom".to_string()));
        fields.set_agent_name(Some("invoice-bot".to_string()));

        assert_eq!(fields.extract_state(), ExtractState::Processing);
        assert_eq!(fields.json.as_deref(), Some("{}"));
        assert_eq!(fields.error.as_deref(), Some("boom"));
        assert_eq!(fields.agent_name(), Some("invoice-bot"));

        // Each run overwrites, never appends
        fields.set_extract_json(Some("{\"a\":1}".to_string()));
        fields.set_extract_error(None);
        assert_eq!(fields.json.as_deref(), Some("{\"a\":1}"));
        assert!(fields.error.is_none());
    }
}
