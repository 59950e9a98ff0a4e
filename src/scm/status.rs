//! Staged-changes classification.
//!
//! Each SCM reports its working-copy state as human-readable text. The
//! classifiers here reduce that text to a [`StagedChangesStatus`]. They are
//! pure functions of the captured output so they can be tested without a
//! repository on disk.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Marker `git status` prints above the list of staged paths.
pub const GIT_STAGED_MARKER: &str = "Changes to be committed:";

/// Marker `git status` prints above the list of modified but unstaged paths.
pub const GIT_UNSTAGED_MARKER: &str = "Changes not staged for commit:";

/// How much of a working copy's changes are staged for the next commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StagedChangesStatus {
    /// The SCM has no staging concept, or staged and unstaged cannot be told apart.
    NoStagingInfo,
    /// Tracked changes exist but none are staged.
    None,
    /// Some changes are staged, some are not.
    Some,
    /// Every change is staged.
    All,
    /// No modifications of any kind.
    NoChanges,
}

impl StagedChangesStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StagedChangesStatus::NoStagingInfo => "no staging info",
            StagedChangesStatus::None => "none staged",
            StagedChangesStatus::Some => "partially staged",
            StagedChangesStatus::All => "all staged",
            StagedChangesStatus::NoChanges => "no changes",
        }
    }
}

impl fmt::Display for StagedChangesStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify `git status` output by looking for the staged and unstaged markers.
///
/// This matches the untranslated wording of `git status`, which is why the
/// runner forces the C locale for SCM subprocesses.
pub fn classify_git(status_output: &str) -> StagedChangesStatus {
    let has_staged = status_output.contains(GIT_STAGED_MARKER);
    let has_unstaged = status_output.contains(GIT_UNSTAGED_MARKER);

    match (has_staged, has_unstaged) {
        (true, true) => StagedChangesStatus::Some,
        (true, false) => StagedChangesStatus::All,
        (false, true) => StagedChangesStatus::None,
        (false, false) => StagedChangesStatus::NoChanges,
    }
}

/// Classify status output from an SCM without a staging area (Mercurial, Subversion).
///
/// Every modification is implicitly part of the next commit, so any output at
/// all means everything is staged.
pub fn classify_stageless(status_output: &str) -> StagedChangesStatus {
    if status_output.trim().is_empty() {
        StagedChangesStatus::NoChanges
    } else {
        StagedChangesStatus::All
    }
}

/// Per-run memo of classified statuses, keyed by repository path.
///
/// Created fresh for each commit run and dropped with it, so a status is
/// never reused across runs or across different paths.
#[derive(Debug, Default)]
pub struct StatusCache {
    entries: HashMap<PathBuf, StagedChangesStatus>,
}

impl StatusCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, repo_path: &Path) -> Option<StagedChangesStatus> {
        self.entries.get(repo_path).copied()
    }

    pub fn insert(&mut self, repo_path: &Path, status: StagedChangesStatus) {
        self.entries.insert(repo_path.to_path_buf(), status);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIT_STAGED_ONLY: &str = "On branch main\n\
        Changes to be committed:\n  (use \"git restore --staged <file>...\" to unstage)\n\
        \tmodified:   src/lib.rs\n";

    const GIT_UNSTAGED_ONLY: &str = "On branch main\n\
        Changes not staged for commit:\n  (use \"git add <file>...\" to update what will be committed)\n\
        \tmodified:   README.md\n";

    const GIT_CLEAN: &str = "On branch main\nnothing to commit, working tree clean\n";

    #[test]
    fn test_classify_git_covers_every_marker_combination() {
        let both = format!("{GIT_STAGED_ONLY}\n{GIT_UNSTAGED_ONLY}");
        assert_eq!(classify_git(&both), StagedChangesStatus::Some);
        assert_eq!(classify_git(GIT_STAGED_ONLY), StagedChangesStatus::All);
        assert_eq!(classify_git(GIT_UNSTAGED_ONLY), StagedChangesStatus::None);
        assert_eq!(classify_git(GIT_CLEAN), StagedChangesStatus::NoChanges);
    }

    #[test]
    fn test_classify_git_never_reports_no_staging_info() {
        for output in ["", GIT_CLEAN, GIT_STAGED_ONLY, GIT_UNSTAGED_ONLY] {
            assert_ne!(classify_git(output), StagedChangesStatus::NoStagingInfo);
        }
    }

    #[test]
    fn test_classify_git_ignores_untracked_only() {
        let output = "On branch main\nUntracked files:\n\tnew.txt\n";
        assert_eq!(classify_git(output), StagedChangesStatus::NoChanges);
    }

    #[test]
    fn test_classify_stageless() {
        assert_eq!(classify_stageless("M  src/main.rs\n"), StagedChangesStatus::All);
        assert_eq!(classify_stageless(""), StagedChangesStatus::NoChanges);
        assert_eq!(classify_stageless("  \n"), StagedChangesStatus::NoChanges);
    }

    #[test]
    fn test_status_cache_is_keyed_by_path() {
        let mut cache = StatusCache::new();
        assert!(cache.is_empty());

        cache.insert(Path::new("/repo/a"), StagedChangesStatus::All);
        assert_eq!(cache.get(Path::new("/repo/a")), Some(StagedChangesStatus::All));
        assert_eq!(cache.get(Path::new("/repo/b")), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(StagedChangesStatus::Some.to_string(), "partially staged");
        assert_eq!(StagedChangesStatus::NoChanges.to_string(), "no changes");
    }
}
