//! Provider selection and fallback orchestration.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::claude;
use crate::codex;
use crate::error::{ClaudeError, CodexError};

use super::MessageGenerator;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Claude,
    Codex,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "Claude",
            Provider::Codex => "Codex",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "claude" => Ok(Provider::Claude),
            "codex" => Ok(Provider::Codex),
            other => Err(format!("unknown provider '{other}' (expected claude or codex)")),
        }
    }
}

/// Primary + fallback selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderSelection {
    pub primary: Provider,
    pub fallback: Provider,
}

impl ProviderSelection {
    pub fn from_primary(primary: Provider) -> Self {
        let fallback = match primary {
            Provider::Claude => Provider::Codex,
            Provider::Codex => Provider::Claude,
        };
        Self { primary, fallback }
    }
}

impl Default for ProviderSelection {
    fn default() -> Self {
        ProviderSelection::from_primary(Provider::Claude)
    }
}

/// Model and credential overrides for one provider invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOptions {
    pub model: Option<String>,
    pub key: Option<String>,
}

/// A failure from one provider, after its own retries.
#[derive(Debug, Error)]
pub enum LlmProviderError {
    #[error(transparent)]
    Claude(#[from] ClaudeError),
    #[error(transparent)]
    Codex(#[from] CodexError),
}

impl LlmProviderError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmProviderError::Claude(_) => Provider::Claude,
            LlmProviderError::Codex(_) => Provider::Codex,
        }
    }
}

/// Commit message generation failed on both providers.
#[derive(Debug, Error)]
#[error("{primary} failed: {primary_error}. {fallback} failed: {fallback_error}")]
pub struct LlmError {
    pub primary: Provider,
    pub primary_error: LlmProviderError,
    pub fallback: Provider,
    pub fallback_error: LlmProviderError,
}

#[async_trait]
trait ProviderRunner: Send + Sync {
    async fn run(
        &self,
        provider: Provider,
        prompt: &str,
        system_prompt: &str,
        options: &ModelOptions,
    ) -> Result<String, LlmProviderError>;
}

struct DefaultRunner;

#[async_trait]
impl ProviderRunner for DefaultRunner {
    async fn run(
        &self,
        provider: Provider,
        prompt: &str,
        system_prompt: &str,
        options: &ModelOptions,
    ) -> Result<String, LlmProviderError> {
        match provider {
            Provider::Claude => claude::generate_with_retry(prompt, system_prompt, options)
                .await
                .map_err(LlmProviderError::from),
            Provider::Codex => codex::generate_with_retry(prompt, system_prompt, options)
                .await
                .map_err(LlmProviderError::from),
        }
    }
}

/// Provider router with fallback and stickiness.
///
/// Model and key overrides name a model of the selected provider, so they are
/// only handed to the primary; the fallback runs with its own defaults.
pub struct LlmRouter {
    primary: Provider,
    fallback: Provider,
    options: ModelOptions,
    options_provider: Provider,
}

impl LlmRouter {
    pub fn new(selection: ProviderSelection, options: ModelOptions) -> Self {
        Self {
            primary: selection.primary,
            fallback: selection.fallback,
            options,
            options_provider: selection.primary,
        }
    }

    pub fn primary(&self) -> Provider {
        self.primary
    }

    pub fn fallback(&self) -> Provider {
        self.fallback
    }

    fn options_for(&self, provider: Provider) -> ModelOptions {
        if provider == self.options_provider {
            self.options.clone()
        } else {
            ModelOptions::default()
        }
    }

    async fn generate_with_runner<R: ProviderRunner>(
        &mut self,
        prompt: &str,
        system_prompt: &str,
        runner: &R,
    ) -> Result<String, LlmError> {
        let primary = self.primary;
        let fallback = self.fallback;

        let primary_error = match runner
            .run(primary, prompt, system_prompt, &self.options_for(primary))
            .await
        {
            Ok(output) => return Ok(output),
            Err(e) => e,
        };

        warn!("{} failed ({}), falling back to {}", primary, primary_error, fallback);

        match runner
            .run(fallback, prompt, system_prompt, &self.options_for(fallback))
            .await
        {
            Ok(output) => {
                self.primary = fallback;
                self.fallback = primary;
                Ok(output)
            }
            Err(fallback_error) => Err(LlmError {
                primary,
                primary_error,
                fallback,
                fallback_error,
            }),
        }
    }
}

#[async_trait]
impl MessageGenerator for LlmRouter {
    async fn generate(&mut self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        self.generate_with_runner(prompt, system_prompt, &DefaultRunner)
            .await
    }
}
