//! docsift CLI - Command-line interface for document extraction.

use clap::Parser;
use docsift_cli::commands;
use docsift_cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log to stderr so extraction output on stdout stays pipeable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract(args) => {
            commands::execute_extract(args, cli.config.as_deref()).await?;
        }
        Command::Prompt(args) => {
            commands::execute_prompt(args)?;
        }
    }

    Ok(())
}
