//! Claude CLI integration.

pub mod retry;
pub mod subprocess;

pub use retry::{ClaudeExecutor, DefaultExecutor, generate_with_retry};
pub use subprocess::run_claude;
