//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

use async_trait::async_trait;

use llm_commit::error::ScmError;
use llm_commit::llm::{LlmError, MessageGenerator};
use llm_commit::scm::{CommandRunner, ProcessOutput};

/// A temporary directory with SCM metadata directories created in it.
pub struct FixtureDir {
    pub dir: tempfile::TempDir,
}

impl FixtureDir {
    /// Create a temp dir containing each of `markers` (e.g. ".git") as a directory.
    pub fn with_markers(markers: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        for marker in markers {
            std::fs::create_dir(dir.path().join(marker)).expect("Failed to create marker dir");
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Runner that answers SCM calls from a table keyed by "program arg arg...".
///
/// Unknown calls fail the test.
#[derive(Default)]
pub struct ScriptedRunner {
    responses: HashMap<String, ProcessOutput>,
    pub calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, call: &str, output: ProcessOutput) -> Self {
        self.responses.insert(call.to_string(), output);
        self
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[String], _cwd: &Path) -> Result<ProcessOutput, ScmError> {
        let call = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.borrow_mut().push(call.clone());
        match self.responses.get(&call) {
            Some(output) => Ok(output.clone()),
            None => panic!("unexpected SCM call: {call}"),
        }
    }
}

/// Generator that always returns the same message and records its prompts.
pub struct FixedGenerator {
    pub message: String,
    pub prompts: Vec<(String, String)>,
}

impl FixedGenerator {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            prompts: Vec::new(),
        }
    }
}

#[async_trait]
impl MessageGenerator for FixedGenerator {
    async fn generate(&mut self, prompt: &str, system_prompt: &str) -> Result<String, LlmError> {
        self.prompts
            .push((prompt.to_string(), system_prompt.to_string()));
        Ok(self.message.clone())
    }
}

/// Whether `program` is on PATH; tests needing a real binary skip without it.
pub fn has_program(program: &str) -> bool {
    which::which(program).is_ok()
}

/// Run git in `dir`, panicking on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Initialise a git repository with one committed file, `tracked.txt`.
pub fn init_git_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    std::fs::write(dir.path().join("tracked.txt"), "original\n").expect("Failed to write file");
    git(dir.path(), &["add", "tracked.txt"]);
    git(dir.path(), &["commit", "-q", "-m", "init"]);
    dir
}
