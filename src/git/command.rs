//! git::command
//!
//! Argument vectors for every git invocation wtkit makes.
//!
//! Each builder returns the arguments that follow the `git` executable.
//! Paths and branch names are separate vector elements, never joined
//! into a shell string, so no quoting is applied or needed.

use std::collections::BTreeSet;

/// Prefix stripped from remote branch names before merging.
const ORIGIN_PREFIX: &str = "origin/";

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

/// `git worktree list --porcelain`
pub fn list_worktrees() -> Vec<String> {
    args(["worktree", "list", "--porcelain"])
}

/// `git worktree add <path> <branch>` - check out an existing branch.
pub fn add_worktree(worktree_path: &str, branch: &str) -> Vec<String> {
    args(["worktree", "add", worktree_path, branch])
}

/// `git worktree add -b <branch> <path> [<base>]` - create a new branch.
///
/// The base branch, when given, is the trailing commit-ish argument.
pub fn add_worktree_new_branch(
    worktree_path: &str,
    branch: &str,
    base_branch: Option<&str>,
) -> Vec<String> {
    let mut argv = args(["worktree", "add", "-b", branch, worktree_path]);
    if let Some(base) = base_branch {
        argv.push(base.to_string());
    }
    argv
}

/// `git worktree remove [--force] <path>`
pub fn remove_worktree(worktree_path: &str, force: bool) -> Vec<String> {
    let mut argv = args(["worktree", "remove"]);
    if force {
        argv.push("--force".to_string());
    }
    argv.push(worktree_path.to_string());
    argv
}

/// `git worktree prune`
pub fn prune_worktrees() -> Vec<String> {
    args(["worktree", "prune"])
}

/// `git worktree lock [--reason <reason>] <path>`
pub fn lock_worktree(worktree_path: &str, reason: Option<&str>) -> Vec<String> {
    let mut argv = args(["worktree", "lock"]);
    if let Some(reason) = reason {
        argv.push("--reason".to_string());
        argv.push(reason.to_string());
    }
    argv.push(worktree_path.to_string());
    argv
}

/// `git worktree unlock <path>`
pub fn unlock_worktree(worktree_path: &str) -> Vec<String> {
    args(["worktree", "unlock", worktree_path])
}

/// `git branch --format=%(refname:short)`
pub fn local_branches() -> Vec<String> {
    args(["branch", "--format=%(refname:short)"])
}

/// `git branch -r --format=%(refname:short)`
pub fn remote_branches() -> Vec<String> {
    args(["branch", "-r", "--format=%(refname:short)"])
}

/// `git rev-parse --show-toplevel`
pub fn repository_root() -> Vec<String> {
    args(["rev-parse", "--show-toplevel"])
}

/// `git rev-parse --git-common-dir`
///
/// Shared by every worktree of a repository; relative to the working
/// directory when git runs in the main worktree.
pub fn common_dir() -> Vec<String> {
    args(["rev-parse", "--git-common-dir"])
}

/// `git --version`
pub fn version() -> Vec<String> {
    args(["--version"])
}

/// `git status --porcelain --branch`
pub fn status() -> Vec<String> {
    args(["status", "--porcelain", "--branch"])
}

/// Split raw `git branch` output into trimmed, non-empty names.
pub fn branch_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Merge local and remote branch names into one sorted, unique list.
///
/// Local names are kept verbatim. Remote names lose their `origin/`
/// prefix, entries mentioning `HEAD` (such as `origin/HEAD`) are dropped,
/// and names already present locally are skipped.
///
/// # Example
///
/// ```
/// use wtkit::git::command::merge_branch_lists;
///
/// let local = vec!["main".to_string(), "dev".to_string()];
/// let remote = vec!["origin/main".to_string(), "origin/feature".to_string()];
/// assert_eq!(merge_branch_lists(&local, &remote), vec!["dev", "feature", "main"]);
/// ```
pub fn merge_branch_lists(local: &[String], remote: &[String]) -> Vec<String> {
    let local_set: BTreeSet<&str> = local.iter().map(String::as_str).collect();

    let remote_only = remote
        .iter()
        .filter(|name| !name.contains("HEAD"))
        .map(|name| name.strip_prefix(ORIGIN_PREFIX).unwrap_or(name))
        .filter(|name| !local_set.contains(name));

    local
        .iter()
        .map(String::as_str)
        .chain(remote_only)
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Render an argument vector for log output.
pub fn display(argv: &[String]) -> String {
    let mut line = String::from("git");
    for arg in argv {
        line.push(' ');
        if arg.is_empty() || arg.contains(char::is_whitespace) {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}
