//! Version-control adapters.
//!
//! [`Scm`] is a closed set of supported tools. Each variant knows how to
//! recognise its working copy, read its pending changes and build the commit
//! command. Staging state is looked up through a [`ScmSession`], which owns
//! the runner and the per-run status memo.

pub mod runner;
pub mod status;

use std::fmt;
use std::path::Path;

use tracing::debug;

use crate::command::CommandTemplate;
use crate::error::ScmError;

pub use runner::{CommandRunner, ProcessOutput, SystemRunner};
pub use status::{StagedChangesStatus, StatusCache, classify_git, classify_stageless};

/// Supported version-control tools, in detection priority order.
pub const ALL_SCMS: [Scm; 3] = [Scm::Git, Scm::Mercurial, Scm::Subversion];

/// A supported version-control tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scm {
    Git,
    Mercurial,
    Subversion,
}

impl Scm {
    /// Executable name.
    pub fn program(&self) -> &'static str {
        match self {
            Scm::Git => "git",
            Scm::Mercurial => "hg",
            Scm::Subversion => "svn",
        }
    }

    /// Metadata directory that marks a working copy root.
    pub fn metadata_dir(&self) -> &'static str {
        match self {
            Scm::Git => ".git",
            Scm::Mercurial => ".hg",
            Scm::Subversion => ".svn",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scm::Git => "Git",
            Scm::Mercurial => "Mercurial",
            Scm::Subversion => "Subversion",
        }
    }

    /// Whether `repo_path` is a working copy of this SCM.
    ///
    /// Only checks for the metadata entry directly under `repo_path`; no
    /// subprocess is started. Git worktrees and submodules use a `.git` file,
    /// so any entry counts, not just directories.
    pub fn detect(&self, repo_path: &Path) -> bool {
        repo_path.join(self.metadata_dir()).exists()
    }

    /// Whether a successful commit prints nothing worth showing the user.
    pub fn commits_silently(&self) -> bool {
        match self {
            Scm::Git | Scm::Subversion => false,
            Scm::Mercurial => true,
        }
    }

    /// Read the diff that describes what the next commit will contain.
    pub fn get_changes(
        &self,
        session: &mut ScmSession<'_>,
        repo_path: &Path,
    ) -> Result<String, ScmError> {
        let args: Vec<&str> = match self {
            Scm::Git => match session.status(*self, repo_path)? {
                StagedChangesStatus::NoChanges => return Err(ScmError::NoChangesFound),
                StagedChangesStatus::Some | StagedChangesStatus::All => vec!["diff", "--cached"],
                StagedChangesStatus::None | StagedChangesStatus::NoStagingInfo => vec!["diff"],
            },
            Scm::Mercurial => match session.status(*self, repo_path)? {
                StagedChangesStatus::NoChanges => return Err(ScmError::NoChangesFound),
                StagedChangesStatus::None => vec!["diff"],
                _ => vec!["diff", "-r", "."],
            },
            Scm::Subversion => vec!["diff"],
        };

        let output = session.run(self.program(), &args, repo_path)?;
        if !output.success() {
            debug!(
                "{} diff exited with {:?}: {}",
                self.program(),
                output.code,
                output.stderr.trim()
            );
            return Err(ScmError::NoChangesFound);
        }
        if output.stdout.trim().is_empty() {
            return Err(ScmError::NoChangesFound);
        }

        Ok(output.stdout)
    }

    /// Build the commit command with the message left as a placeholder.
    ///
    /// `force_all` asks Git to stage every tracked change at commit time. Git
    /// also does so on its own when nothing is staged yet.
    pub fn get_command(
        &self,
        session: &mut ScmSession<'_>,
        repo_path: &Path,
        force_all: bool,
    ) -> Result<CommandTemplate, ScmError> {
        let status = session.status(*self, repo_path)?;
        if status == StagedChangesStatus::NoChanges {
            return Err(ScmError::NoChangesToCommit);
        }

        let mut template = CommandTemplate::commit(self.program());
        if *self == Scm::Git && (force_all || status == StagedChangesStatus::None) {
            template.push_literal("-a");
        }

        Ok(template)
    }

    /// Arguments for the status query.
    ///
    /// Git is asked for the long format explicitly so a `status.short` setting
    /// cannot hide the section headers the classifier looks for.
    pub fn status_args(&self) -> &'static [&'static str] {
        match self {
            Scm::Git => &["status", "--long"],
            Scm::Mercurial | Scm::Subversion => &["status"],
        }
    }

    /// Query and classify the working-copy status, bypassing any cache.
    pub fn query_status(
        &self,
        runner: &dyn CommandRunner,
        repo_path: &Path,
    ) -> Result<StagedChangesStatus, ScmError> {
        let args: Vec<String> = self.status_args().iter().map(|a| a.to_string()).collect();
        let output = runner.run(self.program(), &args, repo_path)?;

        if !output.success() {
            let detail = if output.stderr.trim().is_empty() {
                output.stdout
            } else {
                output.stderr
            };
            return Err(ScmError::StatusQueryFailed {
                scm: self.program(),
                code: output.code,
                output: detail,
            });
        }

        Ok(match self {
            Scm::Git => classify_git(&output.stdout),
            Scm::Mercurial | Scm::Subversion => classify_stageless(&output.stdout),
        })
    }
}

impl fmt::Display for Scm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the first SCM, in priority order, whose metadata exists under `repo_path`.
pub fn select_scm(repo_path: &Path) -> Result<Scm, ScmError> {
    ALL_SCMS
        .into_iter()
        .find(|scm| scm.detect(repo_path))
        .ok_or_else(|| ScmError::UnsupportedRepository {
            path: repo_path.to_path_buf(),
            known: ALL_SCMS.iter().map(|s| s.program()).collect(),
        })
}

/// State shared by adapter calls during a single commit run.
pub struct ScmSession<'r> {
    runner: &'r dyn CommandRunner,
    cache: StatusCache,
}

impl<'r> ScmSession<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self {
            runner,
            cache: StatusCache::new(),
        }
    }

    /// Staging status for `repo_path`, queried at most once per session.
    pub fn status(&mut self, scm: Scm, repo_path: &Path) -> Result<StagedChangesStatus, ScmError> {
        if let Some(status) = self.cache.get(repo_path) {
            return Ok(status);
        }

        let status = scm.query_status(self.runner, repo_path)?;
        debug!("{} status for {}: {}", scm, repo_path.display(), status);
        self.cache.insert(repo_path, status);
        Ok(status)
    }

    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<ProcessOutput, ScmError> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.runner.run(program, &args, cwd)
    }
}
