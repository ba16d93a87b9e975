//! Record identity and field values
//!
//! Records live in an external store and are addressed by an opaque model
//! name plus a numeric id. Field values are an ordered JSON object so that
//! mapped fields keep their mapping order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a record within its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The raw numeric id.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        RecordId(id)
    }
}

/// Field name → value map used when creating or reading a record.
pub type FieldValues = serde_json::Map<String, serde_json::Value>;
