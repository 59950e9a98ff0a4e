//! Prompt construction for commit message generation.

use tracing::debug;

/// Maximum characters of change text sent to the model.
pub const MAX_CHANGES_LENGTH: usize = 30_000;

const TRUNCATION_NOTE: &str =
    "\n\nNote: The diff was truncated due to size. Focus on the visible changes.";

/// Build the prompt from the working-copy changes.
///
/// The changes are the prompt; oversized diffs are cut at a character
/// boundary and followed by a note so the model knows it saw only part.
pub fn build_commit_prompt(changes: &str) -> String {
    match changes.char_indices().nth(MAX_CHANGES_LENGTH) {
        Some((cut, _)) => {
            debug!(
                "Truncating changes from {} to {} chars",
                changes.chars().count(),
                MAX_CHANGES_LENGTH
            );
            format!("{}{}", &changes[..cut], TRUNCATION_NOTE)
        }
        None => changes.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_changes_are_the_prompt() {
        let diff = "diff --git a/x b/x\n+hello\n";
        assert_eq!(build_commit_prompt(diff), diff);
    }

    #[test]
    fn test_exact_limit_is_not_truncated() {
        let diff = "a".repeat(MAX_CHANGES_LENGTH);
        assert_eq!(build_commit_prompt(&diff), diff);
    }

    #[test]
    fn test_large_changes_are_truncated_with_note() {
        let diff = "b".repeat(MAX_CHANGES_LENGTH + 10);
        let prompt = build_commit_prompt(&diff);
        assert!(prompt.starts_with(&"b".repeat(MAX_CHANGES_LENGTH)));
        assert!(prompt.ends_with(TRUNCATION_NOTE));
        assert!(!prompt.contains(&"b".repeat(MAX_CHANGES_LENGTH + 1)));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let diff = "é".repeat(MAX_CHANGES_LENGTH + 1);
        let prompt = build_commit_prompt(&diff);
        assert!(prompt.starts_with(&"é".repeat(MAX_CHANGES_LENGTH)));
        assert!(prompt.contains("truncated"));
    }
}
