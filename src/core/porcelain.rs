//! core::porcelain
//!
//! Parser and renderer for `git worktree list --porcelain`.
//!
//! # Format
//!
//! The output is a sequence of blocks separated by a blank line. Each
//! block describes one worktree with one attribute per line:
//!
//! ```text
//! worktree /repo/main
//! HEAD abc123
//! branch refs/heads/main
//!
//! worktree /repo/wt
//! HEAD def456
//! detached
//! locked reason: busy
//! prunable gitdir file points to non-existent location
//! ```
//!
//! # Rules
//!
//! - Blocks without both a `worktree` and a `HEAD` line are dropped
//!   without an error; only a trace event records them.
//! - Unknown lines are ignored so newer git versions keep parsing.
//! - The first surviving block is the main worktree; this is positional,
//!   no token in the text marks it.
//! - CRLF and LF input parse identically.

use tracing::trace;

use super::types::Worktree;

const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Parse porcelain text into worktrees, preserving block order.
///
/// Never fails: empty input yields an empty list and malformed blocks
/// are skipped.
///
/// # Example
///
/// ```
/// use wtkit::core::porcelain::parse_porcelain;
///
/// let raw = "worktree /repo\nHEAD abc123\nbranch refs/heads/main\n";
/// let worktrees = parse_porcelain(raw);
/// assert_eq!(worktrees.len(), 1);
/// assert_eq!(worktrees[0].branch(), Some("main"));
/// assert!(worktrees[0].is_main_worktree());
/// ```
pub fn parse_porcelain(raw: &str) -> Vec<Worktree> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let mut worktrees: Vec<Worktree> = split_blocks(raw).filter_map(parse_block).collect();

    for (idx, worktree) in worktrees.iter_mut().enumerate() {
        worktree.set_main(idx == 0);
    }

    worktrees
}

/// Split on blank lines, accepting both `\n\n` and `\r\n\r\n`.
fn split_blocks(raw: &str) -> impl Iterator<Item = &str> {
    raw.split("\r\n\r\n")
        .flat_map(|chunk| chunk.split("\n\n"))
        .filter(|block| !block.trim().is_empty())
}

/// Fields accumulated while scanning one block.
#[derive(Default)]
struct BlockFields<'a> {
    path: Option<&'a str>,
    head: Option<&'a str>,
    branch: Option<&'a str>,
    locked: bool,
    lock_reason: Option<&'a str>,
    prunable: bool,
}

fn parse_block(block: &str) -> Option<Worktree> {
    let mut fields = BlockFields::default();

    for line in block.split(['\n', '\r']).filter(|l| !l.is_empty()) {
        if let Some(path) = line.strip_prefix("worktree ") {
            fields.path.get_or_insert(path);
        } else if let Some(head) = line.strip_prefix("HEAD ") {
            fields.head.get_or_insert(head);
        } else if let Some(branch) = line.strip_prefix("branch ") {
            fields
                .branch
                .get_or_insert(branch.strip_prefix(BRANCH_REF_PREFIX).unwrap_or(branch));
        } else if line == "locked" {
            fields.locked = true;
        } else if let Some(reason) = line.strip_prefix("locked reason: ") {
            fields.locked = true;
            fields.lock_reason = Some(reason);
        } else if let Some(reason) = line.strip_prefix("locked ") {
            // git >= 2.31 prints the reason directly after the keyword
            fields.locked = true;
            fields.lock_reason = Some(reason);
        } else if line == "prunable" || line.starts_with("prunable ") {
            fields.prunable = true;
        }
        // `detached`, `bare` and unknown attributes carry no state here
    }

    let (Some(path), Some(head)) = (
        fields.path.filter(|p| !p.is_empty()),
        fields.head.filter(|h| !h.is_empty()),
    ) else {
        trace!(block, "dropping worktree block without path or HEAD");
        return None;
    };

    let mut worktree = Worktree::new(path, head);
    if let Some(branch) = fields.branch {
        worktree = worktree.with_branch(branch);
    }
    if fields.locked {
        worktree = worktree.with_lock(fields.lock_reason.map(str::to_string));
    }
    if fields.prunable {
        worktree = worktree.with_prunable();
    }
    Some(worktree)
}

/// Render worktrees back into porcelain text.
///
/// Detached worktrees get a `detached` line. Lock reasons always use the
/// `locked reason: <reason>` form, whose prefix the parser strips exactly
/// once, so any reason (even one starting with `reason: `) parses back
/// unchanged.
pub fn render_porcelain(worktrees: &[Worktree]) -> String {
    let mut out = String::new();

    for worktree in worktrees {
        out.push_str("worktree ");
        out.push_str(worktree.path());
        out.push('\n');
        out.push_str("HEAD ");
        out.push_str(worktree.head_commit());
        out.push('\n');

        match worktree.branch() {
            Some(branch) => {
                out.push_str("branch ");
                out.push_str(BRANCH_REF_PREFIX);
                out.push_str(branch);
                out.push('\n');
            }
            None => out.push_str("detached\n"),
        }

        if worktree.is_locked() {
            match worktree.lock_reason() {
                Some(reason) => {
                    out.push_str("locked reason: ");
                    out.push_str(reason);
                    out.push('\n');
                }
                None => out.push_str("locked\n"),
            }
        }

        if worktree.is_prunable() {
            out.push_str("prunable\n");
        }

        out.push('\n');
    }

    out
}
