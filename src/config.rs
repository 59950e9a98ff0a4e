//! Run configuration and defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::llm::{ModelOptions, ProviderSelection};

/// System prompt used unless the caller supplies one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Generate a concise and descriptive commit message following these rules:
- Start with a verb in imperative mood (e.g., \"Add\", \"Fix\", \"Update\")
- Keep the first line under 50 characters
- Focus on WHAT and WHY, not HOW
- Do not include any markdown, quotes, or other formatting
- Return only the commit message text, nothing else

For example, if the changes are: Added user authentication with JWT
You return only: Add JWT-based user authentication system";

/// Default timeout for provider subprocess execution (5 minutes).
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 300;

/// Options for talking to the message generator.
#[derive(Debug, Clone, Default)]
pub struct GenerationConfig {
    pub provider: ProviderSelection,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub key: Option<String>,
}

impl GenerationConfig {
    /// The override if one was given, otherwise [`DEFAULT_SYSTEM_PROMPT`].
    pub fn system_prompt(&self) -> &str {
        self.system_prompt.as_deref().unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    pub fn model_options(&self) -> ModelOptions {
        ModelOptions {
            model: self.model.clone(),
            key: self.key.clone(),
        }
    }
}

/// Configuration for one commit run, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct CommitConfig {
    /// Working copy to inspect and commit in.
    pub repo_path: PathBuf,
    /// Stage every tracked change at commit time.
    pub force_all: bool,
    /// Run the commit command without showing the edit prompt.
    pub silent: bool,
    pub generation: GenerationConfig,
}

impl CommitConfig {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            force_all: false,
            silent: false,
            generation: GenerationConfig::default(),
        }
    }
}

/// Read a provider timeout from `var`, in seconds.
///
/// Logs a warning and falls back to the default if the variable is set but
/// empty, non-numeric or negative.
pub fn provider_timeout(var: &str) -> Duration {
    match env::var(var) {
        Ok(v) => match v.trim().parse::<u64>() {
            Ok(secs) => Duration::from_secs(secs),
            Err(_) => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    var, v, DEFAULT_PROVIDER_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS)
            }
        },
        Err(_) => Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
    }
}
