//! Review, edit and run the final commit command.
//!
//! The command goes through three stages: it is presented in an editable
//! prompt, the user accepts or edits it, and the result is handed to a shell
//! in the repository directory. Silent mode skips the first two stages.
//!
//! Nothing here returns an error. A command that fails, or a prompt the user
//! abandons, is reported as an [`ExecutionOutcome`] because the user has
//! already seen the exact command.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command, Stdio};

use dialoguer::{Editor, Input};
use tracing::debug;

use crate::error::EditorError;

/// Label of the single-line edit prompt. dialoguer renders it as `Command: `.
pub const EDIT_PROMPT: &str = "Command";

/// What happened to the commit command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// The shell exited with status zero.
    Succeeded { output: String },
    /// The shell exited non-zero, was killed, or could not be started.
    Failed { code: Option<i32>, output: String },
    /// Nothing was executed.
    Cancelled { reason: String },
}

impl ExecutionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionOutcome::Succeeded { .. })
    }

    /// Text shown to the user, ending in exactly one newline unless empty.
    ///
    /// Successful output is passed through verbatim.
    pub fn report(&self) -> String {
        let mut text = self.to_string();
        if !self.is_success() && !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }

    /// Captured stdout and stderr of the command, if it ran.
    pub fn output(&self) -> Option<&str> {
        match self {
            ExecutionOutcome::Succeeded { output } | ExecutionOutcome::Failed { output, .. } => {
                Some(output)
            }
            ExecutionOutcome::Cancelled { .. } => None,
        }
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Succeeded { output } => f.write_str(output),
            ExecutionOutcome::Failed { code, output } => write!(
                f,
                "Command failed with error (exit status {}): {}",
                code.map_or("unknown".to_string(), |c| c.to_string()),
                output
            ),
            ExecutionOutcome::Cancelled { reason } => write!(f, "Commit cancelled: {reason}"),
        }
    }
}

/// How the command should be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// One line; Enter submits.
    SingleLine,
    /// Enter inserts a newline; the user must finish editing explicitly.
    Multiline,
}

impl EditMode {
    pub fn for_command(command: &str) -> Self {
        if command.contains('\n') {
            EditMode::Multiline
        } else {
            EditMode::SingleLine
        }
    }
}

/// Presents a command for review and returns the text to run.
///
/// `Ok(None)` means the user declined to submit.
pub trait CommandEditor {
    fn edit(&self, command: &str, mode: EditMode) -> Result<Option<String>, EditorError>;
}

/// Terminal prompt backed by dialoguer.
///
/// Single-line commands are edited inline. Multiline commands open the
/// user's editor; saving and closing it submits.
#[derive(Debug, Default, Clone, Copy)]
pub struct PromptEditor;

impl CommandEditor for PromptEditor {
    fn edit(&self, command: &str, mode: EditMode) -> Result<Option<String>, EditorError> {
        let edited = match mode {
            EditMode::SingleLine => Input::<String>::new()
                .with_prompt(EDIT_PROMPT)
                .with_initial_text(command)
                .allow_empty(true)
                .interact_text()
                .map(Some)?,
            EditMode::Multiline => {
                println!("Multiline command - save and close the editor to execute");
                Editor::new().edit(command)?
            }
        };
        Ok(edited)
    }
}

/// Show `command` in `editor`, then run whatever the user submits.
pub fn execute_interactive(
    editor: &dyn CommandEditor,
    command: &str,
    cwd: &Path,
) -> ExecutionOutcome {
    let edited = match editor.edit(command, EditMode::for_command(command)) {
        Ok(Some(edited)) => edited,
        Ok(None) => {
            return ExecutionOutcome::Cancelled {
                reason: "editor closed without saving".to_string(),
            };
        }
        Err(e) => {
            return ExecutionOutcome::Cancelled {
                reason: e.to_string(),
            };
        }
    };

    if edited.trim().is_empty() {
        return ExecutionOutcome::Cancelled {
            reason: "empty command".to_string(),
        };
    }

    run_shell(&edited, cwd)
}

/// Run `command` as constructed, without prompting.
pub fn execute_silent(command: &str, cwd: &Path) -> ExecutionOutcome {
    run_shell(command, cwd)
}

/// Run a command line through the platform shell in `cwd`.
///
/// Stdout and stderr both write to one temporary file, so the captured text
/// keeps the order the command produced it in.
pub fn run_shell(command: &str, cwd: &Path) -> ExecutionOutcome {
    debug!("Executing in {}: {}", cwd.display(), command);

    match spawn_captured(command, cwd) {
        Ok((code, output)) if code == Some(0) => ExecutionOutcome::Succeeded { output },
        Ok((code, output)) => ExecutionOutcome::Failed { code, output },
        Err(e) => ExecutionOutcome::Failed {
            code: None,
            output: format!("failed to run shell: {e}"),
        },
    }
}

fn spawn_captured(command: &str, cwd: &Path) -> std::io::Result<(Option<i32>, String)> {
    let mut capture: File = tempfile::tempfile()?;

    let (shell, flag) = if cfg!(windows) { ("cmd", "/C") } else { ("sh", "-c") };
    let status = Command::new(shell)
        .arg(flag)
        .arg(command)
        .current_dir(cwd)
        .stdout(Stdio::from(capture.try_clone()?))
        .stderr(Stdio::from(capture.try_clone()?))
        .status()?;

    capture.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    capture.read_to_end(&mut bytes)?;

    Ok((status.code(), String::from_utf8_lossy(&bytes).to_string()))
}
