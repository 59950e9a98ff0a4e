//! llm-commit - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use llm_commit::config::{CommitConfig, GenerationConfig};
use llm_commit::llm::{LlmRouter, Provider, ProviderSelection};
use llm_commit::{PromptEditor, SystemRunner, run_commit};

/// Use an LLM to generate a commit message and commit with it.
#[derive(Parser, Debug)]
#[command(name = "llm-commit")]
#[command(about = "Use an LLM to generate a commit message")]
#[command(version)]
struct Cli {
    /// Path to the repository (defaults to the current directory)
    #[arg(short = 'p', long)]
    path: Option<PathBuf>,

    /// Stage all tracked changes when committing
    #[arg(short = 'a', long)]
    all: bool,

    /// Commit without reviewing the command first
    #[arg(short = 'y', long)]
    yes: bool,

    /// Model to use
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Custom system prompt
    #[arg(short = 's', long)]
    system: Option<String>,

    /// API key to use
    #[arg(long)]
    key: Option<String>,

    /// LLM provider to try first (claude or codex)
    #[arg(long, default_value = "claude")]
    provider: Provider,

    /// Show debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<CommitConfig> {
        let repo_path = match self.path {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };

        Ok(CommitConfig {
            repo_path,
            force_all: self.all,
            silent: self.yes,
            generation: GenerationConfig {
                provider: ProviderSelection::from_primary(self.provider),
                model: self.model,
                system_prompt: self.system,
                key: self.key,
            },
        })
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,llm_commit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config()?;

    let mut generator = LlmRouter::new(
        config.generation.provider,
        config.generation.model_options(),
    );

    let summary = run_commit(&config, &SystemRunner, &mut generator, &PromptEditor)
        .await
        .context("Commit aborted")?;

    tracing::debug!("Commit outcome for {}: {:?}", summary.scm, summary.outcome);

    Ok(())
}
