//! The commit pipeline: detect, diff, generate, build, execute.

use std::path::Path;

use tracing::debug;

use crate::command::insert_message;
use crate::config::CommitConfig;
use crate::error::CommitError;
use crate::exec::{CommandEditor, ExecutionOutcome, execute_interactive, execute_silent};
use crate::llm::{MessageGenerator, build_commit_prompt};
use crate::scm::{CommandRunner, Scm, ScmSession, select_scm};

/// Printed after a successful commit by an SCM that prints nothing itself.
pub const COMMIT_CONFIRMATION: &str = "Committed.";

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub scm: Scm,
    /// The generated commit message, before quoting.
    pub message: String,
    /// The command line offered for execution.
    pub command: String,
    pub outcome: ExecutionOutcome,
}

/// Generate a commit message for the working copy at `config.repo_path` and commit it.
///
/// Everything up to building the command line is fail-fast. Once the command
/// runs, its result is reported in the summary and never returned as an error.
pub async fn run_commit<G>(
    config: &CommitConfig,
    runner: &dyn CommandRunner,
    generator: &mut G,
    editor: &dyn CommandEditor,
) -> Result<RunSummary, CommitError>
where
    G: MessageGenerator + ?Sized,
{
    let repo_path: &Path = &config.repo_path;

    let scm = select_scm(repo_path)?;
    debug!("Detected {} working copy at {}", scm, repo_path.display());

    let mut session = ScmSession::new(runner);
    let changes = scm.get_changes(&mut session, repo_path)?;

    let prompt = build_commit_prompt(&changes);
    debug!("Prompt length: {} chars", prompt.len());

    let message = generator
        .generate(&prompt, config.generation.system_prompt())
        .await?;

    let template = scm.get_command(&mut session, repo_path, config.force_all)?;
    let command = insert_message(&template, &message)?;

    let outcome = if config.silent {
        execute_silent(&command, repo_path)
    } else {
        execute_interactive(editor, &command, repo_path)
    };

    print!("{}", outcome.report());
    if outcome.is_success() && scm.commits_silently() {
        println!("{}", COMMIT_CONFIRMATION);
    }

    Ok(RunSummary {
        scm,
        message,
        command,
        outcome,
    })
}
