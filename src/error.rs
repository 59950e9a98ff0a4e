//! Error types for llm-commit modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from working-copy inspection (detection, status, diff, command construction).
#[derive(Error, Debug)]
pub enum ScmError {
    #[error("Unsupported repository at {}: no {} metadata found", path.display(), known.join(", "))]
    UnsupportedRepository { path: PathBuf, known: Vec<&'static str> },

    #[error("Failed to get staged changes: {scm} status exited with {}: {}",
            code.map_or("unknown status".to_string(), |c| format!("code {c}")),
            output.trim())]
    StatusQueryFailed {
        scm: &'static str,
        code: Option<i32>,
        output: String,
    },

    #[error("No changes found")]
    NoChangesFound,

    #[error("No changes to commit")]
    NoChangesToCommit,

    #[error("Failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from commit command templates.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Commit command template has no message placeholder: {template}")]
    PlaceholderMissing { template: String },
}

/// Errors from the command review prompt.
#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Errors from Claude CLI operations.
#[derive(Error, Debug)]
pub enum ClaudeError {
    #[error("Claude Code CLI not found. Install with: npm install -g @anthropic-ai/claude-code")]
    NotInstalled,

    #[error("Claude Code CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Claude process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Claude process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Claude CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Claude returned an empty commit message")]
    EmptyResponse,

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<ClaudeError>),
}

/// Errors from Codex CLI operations.
#[derive(Error, Debug)]
pub enum CodexError {
    #[error(
        "Codex CLI not found. Install with: npm install -g @openai/codex (then run `codex` or set CODEX_API_KEY)"
    )]
    NotInstalled,

    #[error("Codex CLI failed to execute: {0}")]
    ExecutionFailed(String),

    #[error("Failed to spawn Codex process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("Codex process timed out after {0} seconds")]
    Timeout(u64),

    #[error("Codex CLI exited with code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("Codex returned an empty commit message")]
    EmptyResponse,

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<CodexError>),
}

/// Errors that abort a commit run before the commit command is executed.
///
/// A commit command that runs and fails is not an error: it is reported through
/// [`crate::exec::ExecutionOutcome`].
#[derive(Error, Debug)]
pub enum CommitError {
    #[error(transparent)]
    Scm(#[from] ScmError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Failed to generate commit message: {0}")]
    Generator(#[from] LlmError),
}
