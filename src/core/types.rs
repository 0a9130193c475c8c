//! core::types
//!
//! Domain types for worktree listings.
//!
//! # Types
//!
//! - [`Worktree`] - One entry of `git worktree list --porcelain`
//! - [`WorktreeStatus`] - Lazily fetched per-worktree enrichment
//!
//! # Invariants
//!
//! A [`Worktree`] cannot carry a lock reason without being locked, and its
//! detached state is derived from the absence of a branch rather than
//! stored. Values are immutable once built; the parser is the only code
//! that decides which entry is the main worktree.
//!
//! # Example
//!
//! ```
//! use wtkit::core::types::Worktree;
//!
//! let wt = Worktree::new("/repo/wt", "def456")
//!     .with_branch("feature/x")
//!     .with_lock(Some("busy".to_string()));
//!
//! assert!(wt.is_locked());
//! assert_eq!(wt.lock_reason(), Some("busy"));
//! assert!(!wt.is_detached());
//! ```

use std::path::PathBuf;

use serde::Serialize;

/// A single registered worktree.
///
/// Paths are kept exactly as git printed them; no separator normalization
/// is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Worktree {
    path: String,
    head_commit: String,
    branch: Option<String>,
    is_main_worktree: bool,
    is_locked: bool,
    lock_reason: Option<String>,
    is_prunable: bool,
}

impl Worktree {
    /// Create an unlocked, non-prunable, detached worktree entry.
    pub fn new(path: impl Into<String>, head_commit: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            head_commit: head_commit.into(),
            branch: None,
            is_main_worktree: false,
            is_locked: false,
            lock_reason: None,
            is_prunable: false,
        }
    }

    /// Set the checked-out branch (short name, e.g. `feature/x`).
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Mark the worktree locked, optionally with a reason.
    pub fn with_lock(mut self, reason: Option<String>) -> Self {
        self.is_locked = true;
        self.lock_reason = reason;
        self
    }

    /// Mark the worktree prunable.
    pub fn with_prunable(mut self) -> Self {
        self.is_prunable = true;
        self
    }

    pub(crate) fn set_main(&mut self, is_main: bool) {
        self.is_main_worktree = is_main;
    }

    /// Filesystem path of the worktree, verbatim.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path as a [`PathBuf`].
    pub fn path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Full SHA of the checked-out commit.
    pub fn head_commit(&self) -> &str {
        &self.head_commit
    }

    /// Abbreviated SHA for display.
    pub fn short_head(&self) -> &str {
        let end = self
            .head_commit
            .char_indices()
            .nth(7)
            .map(|(i, _)| i)
            .unwrap_or(self.head_commit.len());
        &self.head_commit[..end]
    }

    /// Short branch name, or `None` when detached.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// True when no branch is checked out.
    pub fn is_detached(&self) -> bool {
        self.branch.is_none()
    }

    /// True for the repository's primary worktree.
    pub fn is_main_worktree(&self) -> bool {
        self.is_main_worktree
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    /// Lock reason, only ever set on locked worktrees.
    pub fn lock_reason(&self) -> Option<&str> {
        self.lock_reason.as_deref()
    }

    pub fn is_prunable(&self) -> bool {
        self.is_prunable
    }
}

/// Working-tree state of a single worktree.
///
/// Not part of the porcelain listing; computed from
/// `git status --porcelain --branch` run inside the worktree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WorktreeStatus {
    /// Tracked files with staged or unstaged changes (including conflicts)
    pub modified: usize,
    /// Untracked files
    pub untracked: usize,
    /// Commits ahead of upstream
    pub ahead: usize,
    /// Commits behind upstream
    pub behind: usize,
    /// Whether the checked-out branch tracks an existing upstream
    pub has_upstream: bool,
}

impl WorktreeStatus {
    /// Parse the output of `git status --porcelain --branch`.
    ///
    /// Lines that are neither the `##` header, untracked (`??`) nor
    /// ignored (`!!`) entries count as modified files.
    ///
    /// # Example
    ///
    /// ```
    /// use wtkit::core::types::WorktreeStatus;
    ///
    /// let status = WorktreeStatus::parse("## main...origin/main [ahead 2]\n M a.rs\n?? b.rs\n");
    /// assert_eq!(status.modified, 1);
    /// assert_eq!(status.untracked, 1);
    /// assert_eq!(status.ahead, 2);
    /// assert!(status.has_upstream);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut status = WorktreeStatus::default();

        for line in raw.split(['\n', '\r']).filter(|l| !l.is_empty()) {
            if let Some(header) = line.strip_prefix("## ") {
                status.apply_branch_header(header);
            } else if line.starts_with("?? ") {
                status.untracked += 1;
            } else if line.starts_with("!! ") {
                continue;
            } else {
                status.modified += 1;
            }
        }

        status
    }

    fn apply_branch_header(&mut self, header: &str) {
        let (refs, tracking) = match header.find(" [") {
            Some(idx) => (&header[..idx], Some(&header[idx + 2..])),
            None => (header, None),
        };

        self.has_upstream = refs.contains("...");

        let Some(tracking) = tracking.map(|t| t.trim_end_matches(']')) else {
            return;
        };

        for part in tracking.split(',').map(str::trim) {
            if part == "gone" {
                self.has_upstream = false;
            } else if let Some(n) = part.strip_prefix("ahead ") {
                self.ahead = n.parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                self.behind = n.parse().unwrap_or(0);
            }
        }
    }

    /// True when there is nothing to commit and nothing untracked.
    pub fn is_clean(&self) -> bool {
        self.modified == 0 && self.untracked == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod worktree {
        use super::*;

        #[test]
        fn new_is_detached_and_unlocked() {
            let wt = Worktree::new("/repo", "abc123");
            assert!(wt.is_detached());
            assert!(!wt.is_locked());
            assert!(wt.lock_reason().is_none());
            assert!(!wt.is_prunable());
            assert!(!wt.is_main_worktree());
        }

        #[test]
        fn lock_without_reason_is_valid() {
            let wt = Worktree::new("/repo", "abc123").with_lock(None);
            assert!(wt.is_locked());
            assert!(wt.lock_reason().is_none());
        }

        #[test]
        fn short_head_truncates() {
            let wt = Worktree::new("/repo", "0123456789abcdef");
            assert_eq!(wt.short_head(), "0123456");

            let short = Worktree::new("/repo", "abc");
            assert_eq!(short.short_head(), "abc");
        }

        #[test]
        fn windows_path_kept_verbatim() {
            let wt = Worktree::new(r"C:\src\repo", "abc123");
            assert_eq!(wt.path(), r"C:\src\repo");
        }
    }

    mod status {
        use super::*;

        #[test]
        fn clean_branch_with_upstream() {
            let status = WorktreeStatus::parse("## main...origin/main\n");
            assert!(status.is_clean());
            assert!(status.has_upstream);
            assert_eq!(status.ahead, 0);
            assert_eq!(status.behind, 0);
        }

        #[test]
        fn ahead_and_behind() {
            let status = WorktreeStatus::parse("## dev...origin/dev [ahead 3, behind 12]\n");
            assert_eq!(status.ahead, 3);
            assert_eq!(status.behind, 12);
        }

        #[test]
        fn behind_only() {
            let status = WorktreeStatus::parse("## dev...origin/dev [behind 1]");
            assert_eq!(status.ahead, 0);
            assert_eq!(status.behind, 1);
        }

        #[test]
        fn gone_upstream() {
            let status = WorktreeStatus::parse("## dev...origin/dev [gone]\n");
            assert!(!status.has_upstream);
        }

        #[test]
        fn no_upstream() {
            let status = WorktreeStatus::parse("## feature\n M src/lib.rs\n");
            assert!(!status.has_upstream);
            assert_eq!(status.modified, 1);
        }

        #[test]
        fn detached_head() {
            let status = WorktreeStatus::parse("## HEAD (no branch)\n");
            assert!(!status.has_upstream);
        }

        #[test]
        fn counts_entries() {
            let raw = "## main\r\nM  staged.rs\r\n M unstaged.rs\r\nUU conflict.rs\r\n?? new.rs\r\n?? other.rs\r\n!! target/\r\n";
            let status = WorktreeStatus::parse(raw);
            assert_eq!(status.modified, 3);
            assert_eq!(status.untracked, 2);
            assert!(!status.is_clean());
        }

        #[test]
        fn empty_output() {
            assert_eq!(WorktreeStatus::parse(""), WorktreeStatus::default());
        }
    }
}
