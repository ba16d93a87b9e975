//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::{CliError, Result};
use docsift_extractor::{Orchestrator, OrchestratorConfig};
use docsift_llm::{DirectHttpBackend, GeminiClient};
use docsift_store::EnvSecrets;
use std::fs;
use std::path::Path;

/// Execute the extract command.
///
/// Runs the template against the given document and prints the extracted
/// JSON to stdout. API keys come from the environment (`AI_GOOGLE_KEY`,
/// `AI_OPENAI_KEY`).
pub async fn execute_extract(args: ExtractArgs, config_path: Option<&Path>) -> Result<()> {
    let template = super::load_template(&args.template)?;

    let config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let config = OrchestratorConfig::from_toml(&text).map_err(CliError::Config)?;
            config.validate().map_err(CliError::Config)?;
            config
        }
        None => OrchestratorConfig::default(),
    };

    let bytes = fs::read(&args.document)?;
    let filename = args
        .document
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput("document path has no filename".to_string()))?;

    let mut backend = DirectHttpBackend::new(EnvSecrets::new());
    if let Some(url) = args.gemini_url {
        backend = backend.with_gemini(GeminiClient::with_base_url(url));
    }

    let orchestrator = Orchestrator::new(backend).with_config(config);
    let extracted = orchestrator
        .process_test_document(&template, &bytes, filename)
        .await?;

    println!("{}", extracted);
    Ok(())
}
