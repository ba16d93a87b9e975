//! In-memory record and attachment stores

use crate::StoreError;
use docsift_domain::{Attachment, BlobStore, FieldValues, RecordId, RecordStore};
use std::collections::HashMap;
use tracing::debug;

/// Record store backed by hash maps, with per-model field declarations.
///
/// Models must be registered before records can be created in them;
/// creation rejects values targeting undeclared fields. This mirrors the
/// schema validation a real backend would perform.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    models: HashMap<String, Vec<String>>,
    records: HashMap<String, HashMap<u64, FieldValues>>,
    next_id: u64,
}

impl MemoryRecordStore {
    /// Create an empty store with no registered models.
    pub fn new() -> Self {
        Self {
            models: HashMap::new(),
            records: HashMap::new(),
            next_id: 1,
        }
    }

    /// Register a model and the fields it accepts.
    pub fn register_model(&mut self, model: &str, fields: &[&str]) {
        self.models.insert(
            model.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
    }

    /// Number of records in a model (0 for unknown models).
    pub fn record_count(&self, model: &str) -> usize {
        self.records.get(model).map_or(0, HashMap::len)
    }
}

impl RecordStore for MemoryRecordStore {
    type Error = StoreError;

    fn get(&self, model: &str, id: RecordId) -> Result<Option<FieldValues>, StoreError> {
        if !self.models.contains_key(model) {
            return Err(StoreError::UnknownModel(model.to_string()));
        }
        Ok(self
            .records
            .get(model)
            .and_then(|records| records.get(&id.value()))
            .cloned())
    }

    fn create(&mut self, model: &str, values: FieldValues) -> Result<RecordId, StoreError> {
        let declared = self
            .models
            .get(model)
            .ok_or_else(|| StoreError::UnknownModel(model.to_string()))?;
        for field in values.keys() {
            if !declared.contains(field) {
                return Err(StoreError::UnknownField {
                    model: model.to_string(),
                    field: field.clone(),
                });
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.records
            .entry(model.to_string())
            .or_default()
            .insert(id, values);
        debug!(model, id, "record created");
        Ok(RecordId(id))
    }
}

/// Attachment store keyed by owning record.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    attachments: HashMap<(String, u64), Vec<Attachment>>,
}

impl MemoryBlobStore {
    /// Create an empty blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a document to a record.
    pub fn add_attachment(&mut self, model: &str, id: RecordId, attachment: Attachment) {
        self.attachments
            .entry((model.to_string(), id.value()))
            .or_default()
            .push(attachment);
    }
}

impl BlobStore for MemoryBlobStore {
    type Error = StoreError;

    fn list_attachments(&self, model: &str, id: RecordId) -> Result<Vec<Attachment>, StoreError> {
        Ok(self
            .attachments
            .get(&(model.to_string(), id.value()))
            .cloned()
            .unwrap_or_default())
    }
}
