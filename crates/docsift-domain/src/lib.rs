//! docsift Domain Layer
//!
//! Core value types and trait seams for the document extraction pipeline.
//! This crate stays close to zero dependencies (serde for the record value
//! representation, thiserror for the state machine error) and defines the
//! boundaries that all other layers depend upon.
//!
//! ## Key Concepts
//!
//! - **Attachment**: a document borrowed from the blob store for the
//!   duration of one extraction call (bytes or pre-indexed text)
//! - **ExtractState**: the lifecycle of an extraction on its triggering
//!   record (`no_extract → processing → {done, error}`)
//! - **Trait seams**: `RecordStore`, `BlobStore`, `SecretProvider`,
//!   `ExtractionCapable`, implemented by infrastructure crates
//!
//! ## Architecture
//!
//! Business-record persistence, attachment storage, and secret storage are
//! external collaborators. This crate models them as capability traits with
//! opaque string model names; infrastructure implementations live in
//! `docsift-store`, LLM backends in `docsift-llm`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attachment;
pub mod record;
pub mod state;
pub mod traits;

// Re-exports for convenience
pub use attachment::{Attachment, AttachmentData};
pub use record::{FieldValues, RecordId};
pub use state::{ExtractState, StateError};
pub use traits::{BlobStore, ExtractionCapable, ExtractionFields, RecordStore, SecretProvider};
