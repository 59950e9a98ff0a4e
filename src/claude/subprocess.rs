//! Claude CLI spawning.

use std::process::Stdio;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::provider_timeout;
use crate::error::ClaudeError;
use crate::llm::ModelOptions;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "LLM_COMMIT_CLAUDE_TIMEOUT";

/// Environment variable the Claude CLI reads its API key from.
const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Build the argument list for a print-mode Claude invocation.
fn claude_args(prompt: &str, system_prompt: &str, options: &ModelOptions) -> Vec<String> {
    let mut args = vec![
        "-p".to_string(),
        prompt.to_string(),
        "--system-prompt".to_string(),
        system_prompt.to_string(),
        "--output-format".to_string(),
        "json".to_string(),
    ];
    if let Some(model) = &options.model {
        args.push("--model".to_string());
        args.push(model.clone());
    }
    args
}

/// Run Claude CLI with a prompt and return its JSON envelope.
///
/// # Timeout
///
/// Defaults to 300 seconds, configurable through `LLM_COMMIT_CLAUDE_TIMEOUT`.
/// Exceeding it returns `ClaudeError::Timeout`.
pub async fn run_claude(
    prompt: &str,
    system_prompt: &str,
    options: &ModelOptions,
) -> Result<String, ClaudeError> {
    if which::which("claude").is_err() {
        return Err(ClaudeError::NotInstalled);
    }

    let timeout_duration = provider_timeout(TIMEOUT_ENV_VAR);
    let timeout_secs = timeout_duration.as_secs();

    let mut cmd = Command::new("claude");
    cmd.args(claude_args(prompt, system_prompt, options))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(key) = &options.key {
        cmd.env(API_KEY_ENV_VAR, key);
    }

    debug!("Running claude (prompt: {} chars)", prompt.len());

    let output = timeout(timeout_duration, cmd.output())
        .await
        .map_err(|_| ClaudeError::Timeout(timeout_secs))?
        .map_err(ClaudeError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(ClaudeError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
