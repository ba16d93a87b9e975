//! docsift Extractor
//!
//! Turns uploaded documents into structured data using an LLM.
//!
//! # Overview
//!
//! The extractor is the pipeline core: it builds prompts from templates or
//! agent profiles, sends documents to a generation backend, recovers JSON
//! from the answers, and either aggregates per-attachment results onto the
//! triggering record or maps fields onto new records.
//!
//! # Architecture
//!
//! ```text
//! Attachments → Orchestrator → LlmBackend → Parser → Report / Mapper → RecordStore
//! ```
//!
//! # Example Usage
//!
//! ```
//! use docsift_extractor::{AgentProfile, Orchestrator};
//! use docsift_domain::{Attachment, ExtractionFields};
//! use docsift_llm::MockBackend;
//!
//! # tokio_test::block_on(async {
//! let backend = MockBackend::new("{\"vendor_name\": \"Acme\"}");
//! let orchestrator = Orchestrator::new(backend);
//!
//! let agent = AgentProfile {
//!     name: "invoice-bot".to_string(),
//!     model: "gemini-2.0-flash".to_string(),
//!     document_extraction: true,
//!     system_prompt: None,
//! };
//! let attachment = Attachment::binary(
//!     1,
//!     "scan.pdf",
//!     Some("application/pdf".to_string()),
//!     vec![0x25, 0x50, 0x44, 0x46],
//! );
//!
//! let mut record = ExtractionFields::default();
//! let report = orchestrator
//!     .extract_for_record(&mut record, Some(&agent), &[attachment], "expense")
//!     .await
//!     .unwrap();
//!
//! assert_eq!(report.results.len(), 1);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod mapper;
mod orchestrator;
mod parser;
mod prompt;
mod types;


pub use config::{AllFailedPolicy, OrchestratorConfig};
pub use error::ExtractError;
pub use mapper::{map_and_create, MapOutcome};
pub use orchestrator::{DocumentOutcome, Orchestrator};
pub use parser::parse_response;
pub use prompt::{build_agent_prompt, build_template_prompt, predefined_prompt};
pub use types::{
    AgentProfile, AttachmentResult, DocumentType, ExtractionReport, FieldKind, FieldMapping,
    ParsedResponse, ReportStatus, Template,
};
