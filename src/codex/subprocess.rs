//! Codex CLI spawning.

use std::process::Stdio;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::config::provider_timeout;
use crate::error::CodexError;
use crate::llm::ModelOptions;

/// Environment variable to override the default timeout.
pub const TIMEOUT_ENV_VAR: &str = "LLM_COMMIT_CODEX_TIMEOUT";

/// Environment variable the Codex CLI reads its API key from.
const API_KEY_ENV_VAR: &str = "CODEX_API_KEY";

/// Codex has no system prompt flag, so the system prompt leads the prompt text.
fn combined_prompt(prompt: &str, system_prompt: &str) -> String {
    format!("{system_prompt}\n\n## Changes\n\n{prompt}")
}

fn codex_args(prompt: &str, system_prompt: &str, options: &ModelOptions) -> Vec<String> {
    let mut args = vec!["exec".to_string()];
    if let Some(model) = &options.model {
        args.push("--model".to_string());
        args.push(model.clone());
    }
    args.push(combined_prompt(prompt, system_prompt));
    args
}

/// Run `codex exec` with the prompt and return its free-form text response.
///
/// # Timeout
///
/// Defaults to 300 seconds, configurable through `LLM_COMMIT_CODEX_TIMEOUT`.
pub async fn run_codex(
    prompt: &str,
    system_prompt: &str,
    options: &ModelOptions,
) -> Result<String, CodexError> {
    if which::which("codex").is_err() {
        return Err(CodexError::NotInstalled);
    }

    let timeout_duration = provider_timeout(TIMEOUT_ENV_VAR);
    let timeout_secs = timeout_duration.as_secs();

    let mut cmd = Command::new("codex");
    cmd.args(codex_args(prompt, system_prompt, options))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(key) = &options.key {
        cmd.env(API_KEY_ENV_VAR, key);
    }

    debug!("Running codex exec (prompt: {} chars)", prompt.len());

    let output = timeout(timeout_duration, cmd.output())
        .await
        .map_err(|_| CodexError::Timeout(timeout_secs))?
        .map_err(CodexError::SpawnFailed)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let code = output.status.code().unwrap_or(-1);
        return Err(CodexError::NonZeroExit { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
