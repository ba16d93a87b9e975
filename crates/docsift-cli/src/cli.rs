//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// docsift CLI - Extract structured data from documents with an LLM.
#[derive(Debug, Parser)]
#[command(name = "docsift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Orchestrator configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a template against a document and print the extracted JSON
    Extract(ExtractArgs),
    /// Print the resolved prompt for a template
    Prompt(PromptArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Template definition file (TOML)
    #[arg(short, long)]
    pub template: PathBuf,

    /// Document to process (PDF or image)
    pub document: PathBuf,

    /// Override the Gemini API base URL
    #[arg(long, env = "DOCSIFT_GEMINI_URL")]
    pub gemini_url: Option<String>,
}

/// Arguments for the prompt command.
#[derive(Debug, Args)]
pub struct PromptArgs {
    /// Template definition file (TOML)
    #[arg(short, long)]
    pub template: PathBuf,
}
