//! docsift Storage Layer
//!
//! In-memory record and blob stores plus secret providers.
//!
//! The extraction pipeline talks to storage only through the
//! `docsift-domain` traits; the implementations here back the CLI tools
//! and integration tests. A production deployment would put its own
//! database behind the same traits.
//!
//! # Examples
//!
//! ```
//! use docsift_store::MemoryRecordStore;
//! use docsift_domain::{FieldValues, RecordStore};
//!
//! let mut store = MemoryRecordStore::new();
//! store.register_model("expense", &["amount", "vendor"]);
//!
//! let mut values = FieldValues::new();
//! values.insert("amount".to_string(), serde_json::json!(12.5));
//! let id = store.create("expense", values).unwrap();
//! assert!(store.get("expense", id).unwrap().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod memory;
mod secrets;

pub use memory::{MemoryBlobStore, MemoryRecordStore};
pub use secrets::{EnvSecrets, StaticSecrets};

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named model is not registered
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// A value targets a field the model does not declare
    #[error("Unknown field '{field}' on model '{model}'")]
    UnknownField {
        /// Model name
        model: String,
        /// Rejected field name
        field: String,
    },
}
