//! Mapping parsed extraction JSON onto record-store fields

use crate::types::Template;
use docsift_domain::{FieldValues, RecordId, RecordStore};
use serde_json::Value;
use tracing::{info, warn};

/// Outcome of mapping one extraction onto the target model.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOutcome {
    /// A record was created
    Created(RecordId),
    /// No mapping produced a value; nothing was created
    NoValues,
    /// Record creation was attempted and rejected by the store
    Failed(String),
}

/// Translate extracted JSON into field values and create a record.
///
/// Each mapping with a target field contributes the extracted value under
/// its label, falling back to the mapping's default; a field with neither
/// is omitted. Store rejection is a soft failure reported in the outcome,
/// not an error.
pub fn map_and_create<S: RecordStore>(
    store: &mut S,
    template: &Template,
    extracted: &Value,
) -> MapOutcome {
    let mut values = FieldValues::new();
    for mapping in template.writable_mappings() {
        let target = match &mapping.target_field {
            Some(field) => field,
            None => continue,
        };
        match extracted.get(&mapping.label) {
            Some(value) if !value.is_null() => {
                values.insert(target.clone(), value.clone());
            }
            _ => {
                if let Some(default) = &mapping.default_value {
                    values.insert(target.clone(), Value::String(default.clone()));
                }
            }
        }
    }

    if values.is_empty() {
        return MapOutcome::NoValues;
    }

    match store.create(&template.target_model, values) {
        Ok(id) => {
            info!(
                model = %template.target_model,
                record_id = %id,
                "created record from extraction"
            );
            MapOutcome::Created(id)
        }
        Err(e) => {
            warn!(
                model = %template.target_model,
                error = %e,
                "record creation from extraction failed"
            );
            MapOutcome::Failed(e.to_string())
        }
    }
}
