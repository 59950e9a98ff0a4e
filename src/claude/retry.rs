//! Retrying Claude CLI calls and unwrapping the reply.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ClaudeError;
use crate::llm::clean_reply;
use crate::llm::retry::retry_with_backoff;
use crate::llm::ModelOptions;

use super::subprocess::run_claude;

/// Trait for executing Claude CLI commands.
///
/// This abstraction allows mocking the Claude subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClaudeExecutor: Send + Sync {
    /// Run Claude with the given prompts and return the raw response.
    async fn run(&self, prompt: &str, system_prompt: &str) -> Result<String, ClaudeError>;
}

/// Default executor that calls the real Claude CLI.
pub struct DefaultExecutor {
    options: ModelOptions,
}

impl DefaultExecutor {
    pub fn new(options: ModelOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl ClaudeExecutor for DefaultExecutor {
    async fn run(&self, prompt: &str, system_prompt: &str) -> Result<String, ClaudeError> {
        run_claude(prompt, system_prompt, &self.options).await
    }
}

/// Generate a commit message, retrying up to 3 times with exponential backoff.
pub async fn generate_with_retry(
    prompt: &str,
    system_prompt: &str,
    options: &ModelOptions,
) -> Result<String, ClaudeError> {
    generate_with_retry_impl(prompt, system_prompt, &DefaultExecutor::new(options.clone())).await
}

/// Retry implementation that accepts any executor.
pub async fn generate_with_retry_impl<E: ClaudeExecutor>(
    prompt: &str,
    system_prompt: &str,
    executor: &E,
) -> Result<String, ClaudeError> {
    retry_with_backoff(
        || async {
            let response = executor.run(prompt, system_prompt).await?;
            parse_claude_response(&response)
        },
        |e| ClaudeError::RetriesExhausted(Box::new(e)),
    )
    .await
}

/// Claude CLI JSON envelope when using --output-format json
#[derive(Deserialize)]
struct ClaudeCliResponse {
    result: String,
    #[serde(default)]
    is_error: bool,
}

/// Extract the commit message from Claude's response.
///
/// Accepts the JSON envelope or, failing that, treats the whole response as text.
fn parse_claude_response(response: &str) -> Result<String, ClaudeError> {
    let content = match serde_json::from_str::<ClaudeCliResponse>(response) {
        Ok(envelope) if envelope.is_error => {
            return Err(ClaudeError::ExecutionFailed(envelope.result));
        }
        Ok(envelope) => envelope.result,
        Err(_) => response.to_string(),
    };

    clean_reply(&content).ok_or(ClaudeError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_parse_claude_cli_envelope() {
        let response = r#"{"type":"result","subtype":"success","is_error":false,"result":"Add JWT-based user authentication system"}"#;
        assert_eq!(
            parse_claude_response(response).unwrap(),
            "Add JWT-based user authentication system"
        );
    }

    #[test]
    fn test_parse_claude_cli_envelope_error() {
        let response = r#"{"type":"result","is_error":true,"result":"Invalid API key"}"#;
        let result = parse_claude_response(response);
        assert!(matches!(result, Err(ClaudeError::ExecutionFailed(ref m)) if m == "Invalid API key"));
    }

    #[test]
    fn test_parse_claude_plain_text_fallback() {
        assert_eq!(parse_claude_response("Fix typo in README\n").unwrap(), "Fix typo in README");
    }

    #[test]
    fn test_parse_claude_cleans_quoted_result() {
        let response = r#"{"is_error":false,"result":"\"Update docs\""}"#;
        assert_eq!(parse_claude_response(response).unwrap(), "Update docs");
    }

    #[test]
    fn test_parse_claude_empty_result() {
        let response = r#"{"is_error":false,"result":"   "}"#;
        assert!(matches!(parse_claude_response(response), Err(ClaudeError::EmptyResponse)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhaustion() {
        let mut mock = MockClaudeExecutor::new();

        let call_count = Arc::new(AtomicU32::new(0));
        let call_count_clone = call_count.clone();

        mock.expect_run().times(3).returning(move |_, _| {
            call_count_clone.fetch_add(1, Ordering::SeqCst);
            Err(ClaudeError::ExecutionFailed("persistent error".to_string()))
        });

        let result = generate_with_retry_impl("diff", "system", &mock).await;

        assert!(matches!(result, Err(ClaudeError::RetriesExhausted(_))));
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reply_is_retried() {
        let mut mock = MockClaudeExecutor::new();

        let call_count = Arc::new(AtomicU32::new(0));
        let call_count_clone = call_count.clone();

        mock.expect_run().times(2).returning(move |_, _| {
            if call_count_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(r#"{"is_error":false,"result":""}"#.to_string())
            } else {
                Ok(r#"{"is_error":false,"result":"Add parser"}"#.to_string())
            }
        });

        let result = generate_with_retry_impl("diff", "system", &mock).await;
        assert_eq!(result.unwrap(), "Add parser");
    }

    #[tokio::test(start_paused = true)]
    async fn test_system_prompt_is_forwarded() {
        let mut mock = MockClaudeExecutor::new();
        mock.expect_run()
            .withf(|prompt, system| prompt == "diff" && system == "be terse")
            .times(1)
            .returning(|_, _| Ok("Add tests".to_string()));

        let result = generate_with_retry_impl("diff", "be terse", &mock).await;
        assert_eq!(result.unwrap(), "Add tests");
    }
}
