//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Machine-readable formats (`--json`, `--porcelain`) bypass this module's
//! table layout entirely.

use std::fmt::Display;

use crate::core::types::{Worktree, WorktreeStatus};
use crate::git::GitCommandResult;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Branch column text: the branch, or the short commit when detached.
pub fn format_branch(worktree: &Worktree) -> String {
    match worktree.branch() {
        Some(branch) => branch.to_string(),
        None => format!("(detached {})", worktree.short_head()),
    }
}

/// Bracketed flags such as `[locked: busy] [prunable]`.
pub fn format_flags(worktree: &Worktree) -> String {
    let mut flags = Vec::new();
    if worktree.is_locked() {
        match worktree.lock_reason() {
            Some(reason) => flags.push(format!("[locked: {reason}]")),
            None => flags.push("[locked]".to_string()),
        }
    }
    if worktree.is_prunable() {
        flags.push("[prunable]".to_string());
    }
    flags.join(" ")
}

/// One-line summary of a status lookup.
pub fn format_status(status: &GitCommandResult<WorktreeStatus>) -> String {
    let status = match status {
        Ok(status) => status,
        Err(err) => return format!("status unavailable: {err}"),
    };

    let mut parts = Vec::new();
    if status.is_clean() {
        parts.push("clean".to_string());
    } else {
        if status.modified > 0 {
            parts.push(format!("{} modified", status.modified));
        }
        if status.untracked > 0 {
            parts.push(format!("{} untracked", status.untracked));
        }
    }

    if status.has_upstream {
        if status.ahead > 0 {
            parts.push(format!("ahead {}", status.ahead));
        }
        if status.behind > 0 {
            parts.push(format!("behind {}", status.behind));
        }
    } else {
        parts.push("no upstream".to_string());
    }

    parts.join(", ")
}

/// Aligned table of worktrees; `*` marks the main worktree.
///
/// `statuses`, when given, must be in the same order as `worktrees`.
pub fn format_worktree_table(
    worktrees: &[Worktree],
    statuses: Option<&[GitCommandResult<WorktreeStatus>]>,
) -> String {
    let path_width = worktrees
        .iter()
        .map(|wt| wt.path().chars().count())
        .max()
        .unwrap_or(0);
    let branch_width = worktrees
        .iter()
        .map(|wt| format_branch(wt).chars().count())
        .max()
        .unwrap_or(0);

    worktrees
        .iter()
        .enumerate()
        .map(|(idx, wt)| {
            let marker = if wt.is_main_worktree() { '*' } else { ' ' };
            let mut line = format!(
                "{marker} {:<path_width$}  {:<branch_width$}",
                wt.path(),
                format_branch(wt),
            );

            let flags = format_flags(wt);
            if !flags.is_empty() {
                line.push_str("  ");
                line.push_str(&flags);
            }

            if let Some(status) = statuses.and_then(|s| s.get(idx)) {
                line.push_str("  (");
                line.push_str(&format_status(status));
                line.push(')');
            }

            line.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
