//! llm-commit - A CLI tool that writes commit messages with an LLM.
//!
//! # Overview
//!
//! llm-commit detects whether a directory is a Git, Mercurial or Subversion
//! working copy, reads the pending diff, asks Claude Code CLI (falling back to
//! Codex CLI) for a commit message, and offers the resulting commit command
//! for review before running it.

pub mod claude;
pub mod codex;
pub mod command;
pub mod config;
pub mod error;
pub mod exec;
pub mod llm;
pub mod orchestrator;
pub mod scm;

// Re-export commonly used types
pub use command::{CommandTemplate, Token, insert_message, quote};
pub use config::{CommitConfig, DEFAULT_SYSTEM_PROMPT, GenerationConfig};
pub use error::{ClaudeError, CodexError, CommitError, EditorError, ScmError, TemplateError};
pub use exec::{CommandEditor, EditMode, ExecutionOutcome, PromptEditor};
pub use llm::{LlmError, LlmRouter, MessageGenerator, Provider, ProviderSelection};
pub use orchestrator::{RunSummary, run_commit};
pub use scm::{Scm, ScmSession, StagedChangesStatus, SystemRunner, select_scm};
