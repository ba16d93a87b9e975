//! Extraction runs: state transitions, per-attachment calls, result assembly

use crate::config::{AllFailedPolicy, OrchestratorConfig};
use crate::error::ExtractError;
use crate::mapper::{self, MapOutcome};
use crate::parser::parse_response;
use crate::prompt;
use crate::types::{
    AgentProfile, AttachmentResult, ExtractionReport, ReportStatus, Template,
};
use docsift_domain::{Attachment, AttachmentData, ExtractState, ExtractionCapable, RecordStore};
use docsift_llm::{
    DocumentPayload, GenerationParams, LlmBackend, LlmRequest, MediaType,
};
use serde_json::Value;
use tracing::{info, warn};

/// Outcome of a single-document template run.
#[derive(Debug, Clone)]
pub struct DocumentOutcome {
    /// The parsed (or degraded) extraction value
    pub extracted: Value,
    /// What happened when mapping onto the target model
    pub mapped: MapOutcome,
}

/// Drives extraction runs against a generation backend.
///
/// The orchestrator owns no record state; the triggering record is passed
/// in through [`ExtractionCapable`] and mutated in place.
pub struct Orchestrator<B> {
    backend: B,
    config: OrchestratorConfig,
}

impl<B: LlmBackend> Orchestrator<B> {
    /// Create an orchestrator with default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: OrchestratorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Run an agent over every attachment of a record.
    ///
    /// Attachments are processed sequentially. Per-attachment failures are
    /// captured in the result list; configuration and precondition errors
    /// abort the whole run and leave the record in the error state. The
    /// aggregate result is stored on the record as pretty-printed JSON.
    pub async fn extract_for_record<H: ExtractionCapable>(
        &self,
        host: &mut H,
        agent: Option<&AgentProfile>,
        attachments: &[Attachment],
        context_label: &str,
    ) -> Result<ExtractionReport, ExtractError> {
        let agent = agent.ok_or(ExtractError::NoAgentSelected)?;
        if attachments.is_empty() {
            return Err(ExtractError::NoAttachments);
        }

        let state = host.extract_state().transition(ExtractState::Processing)?;
        host.set_extract_state(state);
        host.set_extract_error(None);
        host.set_agent_name(Some(agent.name.clone()));

        info!(
            agent = %agent.name,
            model = %agent.model,
            attachments = attachments.len(),
            "starting extraction run"
        );

        let mut results = Vec::with_capacity(attachments.len());
        for attachment in attachments {
            let request = match self.agent_request(agent, attachment, context_label) {
                Ok(request) => request,
                Err(e) if e.is_fatal() => {
                    return Err(self.abort_run(host, e));
                }
                Err(e) => {
                    warn!(attachment = %attachment.filename, error = %e, "skipping attachment");
                    results.push(AttachmentResult::failure(
                        &attachment.filename,
                        attachment.id,
                        e.to_string(),
                        now(),
                    ));
                    continue;
                }
            };

            match self.backend.generate(&request).await {
                Ok(answer) => {
                    let value = parse_response(&answer).into_value();
                    results.push(AttachmentResult::success(
                        &attachment.filename,
                        attachment.id,
                        value,
                        now(),
                    ));
                }
                Err(e) => {
                    let e = ExtractError::from(e);
                    if e.is_fatal() {
                        return Err(self.abort_run(host, e));
                    }
                    warn!(attachment = %attachment.filename, error = %e, "attachment extraction failed");
                    results.push(AttachmentResult::failure(
                        &attachment.filename,
                        attachment.id,
                        e.to_string(),
                        now(),
                    ));
                }
            }
        }

        let status = if results.is_empty() {
            ReportStatus::NoResults
        } else {
            ReportStatus::Success
        };
        let report = ExtractionReport {
            extraction_timestamp: now(),
            agent_name: agent.name.clone(),
            model: agent.model.clone(),
            results,
            status,
            message: format!("Extraction complete using {}", agent.name),
        };

        host.set_extract_json(Some(report.to_json_pretty()));
        if report.all_failed() && self.config.all_failed_policy == AllFailedPolicy::MarkError {
            host.set_extract_state(ExtractState::Processing.transition(ExtractState::Error)?);
            host.set_extract_error(Some("All attachments failed to extract.".to_string()));
        } else {
            host.set_extract_state(ExtractState::Processing.transition(ExtractState::Done)?);
        }

        info!(agent = %agent.name, results = report.results.len(), "extraction run finished");
        Ok(report)
    }

    /// Run a template over one document and map the result onto records.
    ///
    /// Generation and parse failures leave the record in the error state.
    /// Mapping problems are soft: the extraction is still stored and
    /// reported, with the record marked as errored so a reviewer can see
    /// why nothing was created.
    pub async fn process_document<H, S>(
        &self,
        host: &mut H,
        template: &Template,
        attachment: &Attachment,
        store: &mut S,
    ) -> Result<DocumentOutcome, ExtractError>
    where
        H: ExtractionCapable,
        S: RecordStore,
    {
        let state = host.extract_state().transition(ExtractState::Processing)?;
        host.set_extract_state(state);
        host.set_extract_error(None);

        let extracted = match self.run_template(template, attachment).await {
            Ok(value) => value,
            Err(e) => return Err(self.abort_run(host, e)),
        };

        host.set_extract_json(Some(
            serde_json::to_string_pretty(&extracted).unwrap_or_else(|_| "{}".to_string()),
        ));

        let mapped = mapper::map_and_create(store, template, &extracted);
        match &mapped {
            MapOutcome::Created(_) => {
                host.set_extract_state(ExtractState::Processing.transition(ExtractState::Done)?);
            }
            MapOutcome::NoValues => {
                host.set_extract_state(ExtractState::Processing.transition(ExtractState::Error)?);
                host.set_extract_error(Some(
                    "No mappable values found in extracted data.".to_string(),
                ));
            }
            MapOutcome::Failed(reason) => {
                host.set_extract_state(ExtractState::Processing.transition(ExtractState::Error)?);
                host.set_extract_error(Some(format!("Record creation failed: {reason}")));
            }
        }

        Ok(DocumentOutcome { extracted, mapped })
    }

    /// Run a template over raw document bytes without touching any record.
    ///
    /// Used to preview a template against a sample file; returns the
    /// extraction as pretty-printed JSON.
    pub async fn process_test_document(
        &self,
        template: &Template,
        bytes: &[u8],
        filename: &str,
    ) -> Result<String, ExtractError> {
        let attachment = Attachment::binary(0, filename, None, bytes.to_vec());
        let extracted = self.run_template(template, &attachment).await?;
        Ok(serde_json::to_string_pretty(&extracted).unwrap_or_else(|_| "{}".to_string()))
    }

    async fn run_template(
        &self,
        template: &Template,
        attachment: &Attachment,
    ) -> Result<Value, ExtractError> {
        let prompt = prompt::build_template_prompt(template);
        let mut request = match &attachment.data {
            AttachmentData::Bytes(bytes) => {
                let media = MediaType::resolve(
                    attachment.mimetype.as_deref(),
                    Some(&attachment.filename),
                )?;
                LlmRequest::document(&template.model, prompt, DocumentPayload::new(bytes, media))
            }
            AttachmentData::IndexedText(text) => {
                let mut prompt = prompt;
                prompt.push_str("\n\nDocument content:\n");
                prompt.push_str(&self.cap_inline_text(text));
                LlmRequest::chat(&template.model, prompt)
            }
        };
        request.params = self.config.generation_params();

        let answer = self.backend.generate(&request).await?;
        Ok(parse_response(&answer).into_value())
    }

    /// Build the request for one attachment in an agent run.
    ///
    /// Text attachments are inlined (capped), PDF and image attachments
    /// travel as binary payloads, and anything else is described by
    /// filename only.
    fn agent_request(
        &self,
        agent: &AgentProfile,
        attachment: &Attachment,
        context_label: &str,
    ) -> Result<LlmRequest, ExtractError> {
        let mut request = match &attachment.data {
            AttachmentData::IndexedText(text) => {
                let content = format!(
                    "{} Content:\n{}",
                    attachment.kind_label(),
                    self.cap_inline_text(text)
                );
                let prompt = prompt::build_agent_prompt(
                    agent,
                    context_label,
                    &attachment.filename,
                    Some(&content),
                );
                LlmRequest::chat(&agent.model, prompt)
            }
            AttachmentData::Bytes(bytes) => {
                if is_document_mime(attachment.mimetype.as_deref()) {
                    let prompt = prompt::build_agent_prompt(
                        agent,
                        context_label,
                        &attachment.filename,
                        None,
                    );
                    let media = MediaType::resolve(
                        attachment.mimetype.as_deref(),
                        Some(&attachment.filename),
                    )?;
                    LlmRequest::document(&agent.model, prompt, DocumentPayload::new(bytes, media))
                } else {
                    // No payload path for this type; describe the file instead.
                    let stub = format!(
                        "{}: {}\nType: {}\nSize: {} bytes",
                        attachment.kind_label(),
                        attachment.filename,
                        attachment.mimetype.as_deref().unwrap_or("unknown"),
                        attachment.byte_size()
                    );
                    let prompt = prompt::build_agent_prompt(
                        agent,
                        context_label,
                        &attachment.filename,
                        Some(&stub),
                    );
                    LlmRequest::chat(&agent.model, prompt)
                }
            }
        };
        request.params = GenerationParams::chat();
        Ok(request)
    }

    fn cap_inline_text(&self, text: &str) -> String {
        text.chars().take(self.config.max_inline_text_chars).collect()
    }

    fn abort_run<H: ExtractionCapable>(&self, host: &mut H, error: ExtractError) -> ExtractError {
        warn!(error = %error, "extraction run aborted");
        host.set_extract_state(ExtractState::Error);
        host.set_extract_error(Some(error.to_string()));
        error
    }
}

fn is_document_mime(mimetype: Option<&str>) -> bool {
    match mimetype {
        Some(mime) => mime.contains("pdf") || mime.contains("image"),
        None => true,
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentType;
    use docsift_domain::ExtractionFields;
    use docsift_llm::MockBackend;
    use serde_json::json;

    fn agent(name: &str) -> AgentProfile {
        AgentProfile {
            name: name.into(),
            model: "gemini-2.0-flash".into(),
            document_extraction: true,
            system_prompt: None,
        }
    }

    fn pdf(id: u64, name: &str) -> Attachment {
        Attachment::binary(id, name, Some("application/pdf".into()), vec![1, 2, 3])
    }

    #[test]
    fn test_missing_agent_is_a_precondition() {
        tokio_test::block_on(async {
            let orchestrator = Orchestrator::new(MockBackend::new("{}"));
            let mut host = ExtractionFields::default();
            let err = orchestrator
                .extract_for_record(&mut host, None, &[pdf(1, "a.pdf")], "expense")
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractError::NoAgentSelected));
            // Preconditions fail before any state change.
            assert_eq!(host.extract_state(), ExtractState::NoExtract);
        });
    }

    #[test]
    fn test_empty_attachments_is_a_precondition() {
        tokio_test::block_on(async {
            let orchestrator = Orchestrator::new(MockBackend::new("{}"));
            let mut host = ExtractionFields::default();
            let err = orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[], "expense")
                .await
                .unwrap_err();
            assert!(matches!(err, ExtractError::NoAttachments));
            assert_eq!(host.extract_state(), ExtractState::NoExtract);
        });
    }

    #[test]
    fn test_successful_run_stores_report_and_marks_done() {
        tokio_test::block_on(async {
            let backend = MockBackend::new(r#"{"vendor_name": "Acme"}"#);
            let orchestrator = Orchestrator::new(backend.clone());
            let mut host = ExtractionFields::default();
            let report = orchestrator
                .extract_for_record(
                    &mut host,
                    Some(&agent("invoice-bot")),
                    &[pdf(7, "scan.pdf")],
                    "expense",
                )
                .await
                .unwrap();

            assert_eq!(report.status, ReportStatus::Success);
            assert_eq!(report.results.len(), 1);
            assert!(!report.results[0].is_error());
            assert_eq!(host.extract_state(), ExtractState::Done);
            assert_eq!(host.agent_name(), Some("invoice-bot"));

            let stored: serde_json::Value =
                serde_json::from_str(host.json.as_deref().unwrap()).unwrap();
            assert_eq!(stored["agent_name"], "invoice-bot");
            assert_eq!(stored["results"][0]["extracted_data"]["vendor_name"], "Acme");
            assert_eq!(backend.call_count(), 1);
        });
    }

    #[test]
    fn test_per_attachment_failure_is_captured_not_fatal() {
        tokio_test::block_on(async {
            let backend = MockBackend::new(r#"{"ok": true}"#);
            backend.push_error(docsift_llm::LlmError::EmptyResponse(
                docsift_llm::Provider::Google,
            ));
            backend.push_response(r#"{"ok": true}"#);
            let orchestrator = Orchestrator::new(backend.clone());
            let mut host = ExtractionFields::default();
            let report = orchestrator
                .extract_for_record(
                    &mut host,
                    Some(&agent("a")),
                    &[pdf(1, "bad.pdf"), pdf(2, "good.pdf")],
                    "expense",
                )
                .await
                .unwrap();

            assert_eq!(report.results.len(), 2);
            assert!(report.results[0].is_error());
            assert!(!report.results[1].is_error());
            assert_eq!(host.extract_state(), ExtractState::Done);
        });
    }

    #[test]
    fn test_fatal_error_aborts_run() {
        tokio_test::block_on(async {
            let backend = MockBackend::new("{}");
            backend.push_error(docsift_llm::LlmError::MissingCredential(
                docsift_llm::Provider::Google,
            ));
            let orchestrator = Orchestrator::new(backend.clone());
            let mut host = ExtractionFields::default();
            let err = orchestrator
                .extract_for_record(
                    &mut host,
                    Some(&agent("a")),
                    &[pdf(1, "a.pdf"), pdf(2, "b.pdf")],
                    "expense",
                )
                .await
                .unwrap_err();

            assert!(matches!(err, ExtractError::Llm(_)));
            assert_eq!(host.extract_state(), ExtractState::Error);
            assert!(host.error.as_deref().unwrap().contains("API key"));
            // The run stops at the first fatal error.
            assert_eq!(backend.call_count(), 1);
        });
    }

    #[test]
    fn test_all_failed_policy_mark_error() {
        tokio_test::block_on(async {
            let backend = MockBackend::new("{}");
            backend.push_error(docsift_llm::LlmError::EmptyResponse(
                docsift_llm::Provider::Google,
            ));
            let config = OrchestratorConfig {
                all_failed_policy: AllFailedPolicy::MarkError,
                ..OrchestratorConfig::default()
            };
            let orchestrator = Orchestrator::new(backend).with_config(config);
            let mut host = ExtractionFields::default();
            let report = orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[pdf(1, "a.pdf")], "expense")
                .await
                .unwrap();

            assert!(report.all_failed());
            assert_eq!(host.extract_state(), ExtractState::Error);
            // The aggregate result is still stored for inspection.
            assert!(host.json.is_some());
        });
    }

    #[test]
    fn test_unparseable_answer_degrades_to_raw() {
        tokio_test::block_on(async {
            let backend = MockBackend::new("I cannot read this document.");
            let orchestrator = Orchestrator::new(backend);
            let mut host = ExtractionFields::default();
            let report = orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[pdf(1, "a.pdf")], "expense")
                .await
                .unwrap();

            let data = report.results[0].extracted_data.as_ref().unwrap();
            assert_eq!(data["ai_response"], "I cannot read this document.");
            assert_eq!(data["parsing_note"], "Could not find JSON in response");
            assert_eq!(host.extract_state(), ExtractState::Done);
        });
    }

    #[test]
    fn test_text_attachment_is_inlined_and_capped() {
        tokio_test::block_on(async {
            let backend = MockBackend::new("{}");
            let config = OrchestratorConfig {
                max_inline_text_chars: 10,
                ..OrchestratorConfig::default()
            };
            let orchestrator = Orchestrator::new(backend.clone()).with_config(config);
            let mut host = ExtractionFields::default();
            let attachment = Attachment::indexed_text(3, "notes.txt", "a".repeat(100));
            orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[attachment], "expense")
                .await
                .unwrap();

            let request = backend.last_request().unwrap();
            assert!(request.document.is_none());
            assert!(request.prompt.contains(&"a".repeat(10)));
            assert!(!request.prompt.contains(&"a".repeat(11)));
        });
    }

    #[test]
    fn test_rerun_after_error_and_done() {
        tokio_test::block_on(async {
            let orchestrator = Orchestrator::new(MockBackend::new("{}"));
            let mut host = ExtractionFields::default();
            host.set_extract_state(ExtractState::Error);
            orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[pdf(1, "a.pdf")], "expense")
                .await
                .unwrap();
            assert_eq!(host.extract_state(), ExtractState::Done);

            // A completed record can be re-run; results are overwritten.
            orchestrator
                .extract_for_record(&mut host, Some(&agent("a")), &[pdf(1, "a.pdf")], "expense")
                .await
                .unwrap();
            assert_eq!(host.extract_state(), ExtractState::Done);
        });
    }

    fn invoice_template() -> Template {
        Template {
            name: "invoices".into(),
            target_model: "expense".into(),
            document_type: DocumentType::Invoice,
            model: "gemini-2.0-flash".into(),
            custom_prompt: None,
            mappings: vec![crate::types::FieldMapping {
                label: "total_amount".into(),
                target_field: Some("amount".into()),
                kind: crate::types::FieldKind::Simple,
                example: None,
                default_value: None,
            }],
        }
    }

    #[test]
    fn test_process_document_creates_record() {
        tokio_test::block_on(async {
            let backend = MockBackend::new(r#"{"total_amount": 99.5}"#);
            let orchestrator = Orchestrator::new(backend);
            let mut host = ExtractionFields::default();
            let mut store = docsift_store::MemoryRecordStore::new();
            store.register_model("expense", &["amount"]);

            let outcome = orchestrator
                .process_document(&mut host, &invoice_template(), &pdf(1, "inv.pdf"), &mut store)
                .await
                .unwrap();

            let id = match outcome.mapped {
                MapOutcome::Created(id) => id,
                other => panic!("expected creation, got {other:?}"),
            };
            assert_eq!(
                store.get("expense", id).unwrap().unwrap()["amount"],
                json!(99.5)
            );
            assert_eq!(host.extract_state(), ExtractState::Done);
        });
    }

    #[test]
    fn test_process_document_mapping_failure_is_soft() {
        tokio_test::block_on(async {
            let backend = MockBackend::new(r#"{"unrelated": 1}"#);
            let orchestrator = Orchestrator::new(backend);
            let mut host = ExtractionFields::default();
            let mut store = docsift_store::MemoryRecordStore::new();
            store.register_model("expense", &["amount"]);

            let outcome = orchestrator
                .process_document(&mut host, &invoice_template(), &pdf(1, "inv.pdf"), &mut store)
                .await
                .unwrap();

            assert_eq!(outcome.mapped, MapOutcome::NoValues);
            assert_eq!(host.extract_state(), ExtractState::Error);
            assert!(host.error.as_deref().unwrap().contains("No mappable values"));
            // The extraction itself is still stored.
            assert!(host.json.is_some());
        });
    }

    #[test]
    fn test_process_test_document_returns_pretty_json() {
        tokio_test::block_on(async {
            let backend = MockBackend::new(r#"{"total_amount": 12}"#);
            let orchestrator = Orchestrator::new(backend);
            let rendered = orchestrator
                .process_test_document(&invoice_template(), &[0xFF], "sample.pdf")
                .await
                .unwrap();
            let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
            assert_eq!(value["total_amount"], 12);
        });
    }
}
