//! Retrying Codex CLI calls.

use async_trait::async_trait;

use crate::error::CodexError;
use crate::llm::clean_reply;
use crate::llm::retry::retry_with_backoff;
use crate::llm::ModelOptions;

use super::subprocess::run_codex;

/// One raw Codex invocation; the subprocess seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodexExecutor: Send + Sync {
    async fn run(&self, prompt: &str, system_prompt: &str) -> Result<String, CodexError>;
}

/// Runs the installed `codex` binary.
pub struct DefaultExecutor {
    options: ModelOptions,
}

impl DefaultExecutor {
    pub fn new(options: ModelOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl CodexExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str, system_prompt: &str) -> Result<String, CodexError> {
        run_codex(prompt, system_prompt, &self.options).await
    }
}

/// Ask Codex for a commit message.
///
/// Both failed runs and replies that clean up to nothing are retried.
pub async fn generate_with_retry(
    prompt: &str,
    system_prompt: &str,
    options: &ModelOptions,
) -> Result<String, CodexError> {
    generate_with_retry_impl(prompt, system_prompt, &DefaultExecutor::new(options.clone())).await
}

pub async fn generate_with_retry_impl<E: CodexExecutor>(
    prompt: &str,
    system_prompt: &str,
    executor: &E,
) -> Result<String, CodexError> {
    retry_with_backoff(
        || async {
            let response = executor.run(prompt, system_prompt).await?;
            clean_reply(&response).ok_or(CodexError::EmptyResponse)
        },
        |e| CodexError::RetriesExhausted(Box::new(e)),
    )
    .await
}
