//! Commit message generation through an LLM provider CLI.

pub mod prompt;
pub mod reply;
pub mod retry;
pub mod router;

use async_trait::async_trait;

pub use prompt::{MAX_CHANGES_LENGTH, build_commit_prompt};
pub use reply::clean_reply;
pub use router::{LlmError, LlmProviderError, LlmRouter, ModelOptions, Provider, ProviderSelection};

/// Turns a prompt and a system prompt into a commit message.
///
/// The returned text is plain: no markdown and no surrounding quotes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageGenerator: Send {
    async fn generate(&mut self, prompt: &str, system_prompt: &str) -> Result<String, LlmError>;
}
