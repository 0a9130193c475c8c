//! Property-based tests for the porcelain parser and command builder.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated worktree listings and arguments.

use proptest::prelude::*;

use wtkit::core::porcelain::{parse_porcelain, render_porcelain};
use wtkit::core::types::Worktree;
use wtkit::git::command;

/// Strategy for a path: no line breaks, never empty.
fn path_string() -> impl Strategy<Value = String> {
    prop_oneof![
        "/[a-z0-9_./ -]{1,40}",
        r"[A-Z]:\\[a-zA-Z0-9_\\ -]{1,30}",
    ]
}

/// Strategy for hex SHAs.
fn sha_string() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}"
}

/// Strategy for branch names, possibly hierarchical.
fn branch_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,15}(/[a-z0-9_-]{1,10}){0,2}"
}

/// Strategy for lock reasons, sometimes starting with `reason: `.
fn lock_reason() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 .,:_-]{0,30}",
        "reason: [a-zA-Z0-9 .,:_-]{0,20}",
    ]
}

fn worktree() -> impl Strategy<Value = Worktree> {
    (
        path_string(),
        sha_string(),
        proptest::option::of(branch_name()),
        proptest::option::of(proptest::option::of(lock_reason())),
        any::<bool>(),
    )
        .prop_map(|(path, head, branch, lock, prunable)| {
            let mut wt = Worktree::new(path, head);
            if let Some(branch) = branch {
                wt = wt.with_branch(branch);
            }
            if let Some(reason) = lock {
                wt = wt.with_lock(reason);
            }
            if prunable {
                wt = wt.with_prunable();
            }
            wt
        })
}

/// A block of porcelain text, optionally missing one mandatory line.
#[derive(Debug, Clone)]
struct Block {
    path: Option<String>,
    head: Option<String>,
    branch: Option<String>,
}

impl Block {
    fn is_complete(&self) -> bool {
        self.path.is_some() && self.head.is_some()
    }

    fn render(&self) -> String {
        let mut text = String::new();
        if let Some(path) = &self.path {
            text.push_str(&format!("worktree {path}\n"));
        }
        if let Some(head) = &self.head {
            text.push_str(&format!("HEAD {head}\n"));
        }
        match &self.branch {
            Some(branch) => text.push_str(&format!("branch refs/heads/{branch}\n")),
            None => text.push_str("detached\n"),
        }
        text
    }
}

fn block() -> impl Strategy<Value = Block> {
    (
        proptest::option::weighted(0.8, path_string()),
        proptest::option::weighted(0.8, sha_string()),
        proptest::option::of(branch_name()),
    )
        .prop_map(|(path, head, branch)| Block { path, head, branch })
}

fn join_blocks(blocks: &[Block], crlf: bool) -> String {
    let text = blocks
        .iter()
        .map(Block::render)
        .collect::<Vec<_>>()
        .join("\n");
    if crlf {
        text.replace('\n', "\r\n")
    } else {
        text
    }
}

proptest! {
    /// Rendering records and parsing them back reproduces every field.
    #[test]
    fn render_parse_roundtrip(worktrees in prop::collection::vec(worktree(), 0..8)) {
        let parsed = parse_porcelain(&render_porcelain(&worktrees));
        prop_assert_eq!(parsed.len(), worktrees.len());

        for (original, parsed) in worktrees.iter().zip(&parsed) {
            prop_assert_eq!(parsed.path(), original.path());
            prop_assert_eq!(parsed.head_commit(), original.head_commit());
            prop_assert_eq!(parsed.branch(), original.branch());
            prop_assert_eq!(parsed.is_locked(), original.is_locked());
            prop_assert_eq!(parsed.lock_reason(), original.lock_reason());
            prop_assert_eq!(parsed.is_prunable(), original.is_prunable());
        }
    }

    /// Exactly the first parsed record is the main worktree.
    #[test]
    fn only_first_is_main(blocks in prop::collection::vec(block(), 0..10), crlf in any::<bool>()) {
        let parsed = parse_porcelain(&join_blocks(&blocks, crlf));
        for (idx, wt) in parsed.iter().enumerate() {
            prop_assert_eq!(wt.is_main_worktree(), idx == 0);
        }
    }

    /// Incomplete blocks vanish; complete neighbours survive in order.
    #[test]
    fn malformed_blocks_dropped(blocks in prop::collection::vec(block(), 0..10)) {
        let parsed = parse_porcelain(&join_blocks(&blocks, false));
        let expected: Vec<&Block> = blocks.iter().filter(|b| b.is_complete()).collect();

        prop_assert_eq!(parsed.len(), expected.len());
        for (wt, block) in parsed.iter().zip(expected) {
            prop_assert_eq!(Some(wt.path()), block.path.as_deref());
            prop_assert_eq!(Some(wt.head_commit()), block.head.as_deref());
            // Detached exactly when the block had no branch line
            prop_assert_eq!(wt.branch(), block.branch.as_deref());
            prop_assert_eq!(wt.is_detached(), block.branch.is_none());
        }
    }

    /// CRLF input parses identically to LF input.
    #[test]
    fn crlf_equivalent(blocks in prop::collection::vec(block(), 0..6)) {
        prop_assert_eq!(
            parse_porcelain(&join_blocks(&blocks, true)),
            parse_porcelain(&join_blocks(&blocks, false))
        );
    }

    /// A lock reason is never present on an unlocked record.
    #[test]
    fn lock_reason_implies_locked(worktrees in prop::collection::vec(worktree(), 0..6)) {
        for wt in parse_porcelain(&render_porcelain(&worktrees)) {
            if wt.lock_reason().is_some() {
                prop_assert!(wt.is_locked());
            }
        }
    }

    /// The parser never panics on arbitrary text.
    #[test]
    fn arbitrary_text_does_not_panic(text in "\\PC{0,200}") {
        let parsed = parse_porcelain(&text);
        prop_assert!(parsed.iter().filter(|w| w.is_main_worktree()).count() <= 1);
    }

    /// `-b <branch>` follows `add`, and the path precedes the base.
    #[test]
    fn add_new_branch_shape(
        path in "[^\\x00]{1,30}",
        branch in "[^\\x00]{1,30}",
        base in proptest::option::of("[^\\x00]{1,30}"),
    ) {
        let argv = command::add_worktree_new_branch(&path, &branch, base.as_deref());
        prop_assert_eq!(&argv[0], "worktree");
        prop_assert_eq!(&argv[1], "add");
        prop_assert_eq!(&argv[2], "-b");
        prop_assert_eq!(&argv[3], &branch);
        prop_assert_eq!(&argv[4], &path);
        match base {
            Some(base) => {
                prop_assert_eq!(argv.len(), 6);
                prop_assert_eq!(&argv[5], &base);
            }
            None => prop_assert_eq!(argv.len(), 5),
        }
    }

    /// `--force` sits directly after `remove`; the path is always last.
    #[test]
    fn remove_shape(path in "[^\\x00]{1,30}", force in any::<bool>()) {
        let argv = command::remove_worktree(&path, force);
        prop_assert_eq!(&argv[1], "remove");
        if force {
            prop_assert_eq!(&argv[2], "--force");
            prop_assert_eq!(argv.len(), 4);
        } else {
            prop_assert_eq!(argv.len(), 3);
        }
        prop_assert_eq!(argv.last(), Some(&path));
    }

    /// Merged branch lists are sorted, unique, and cover both inputs.
    #[test]
    fn merged_branches_sorted_unique(
        local in prop::collection::vec("[a-z]{1,6}", 0..6),
        remote in prop::collection::vec("[a-z]{1,6}", 0..6),
    ) {
        let remote_refs: Vec<String> = remote.iter().map(|r| format!("origin/{r}")).collect();
        let merged = command::merge_branch_lists(&local, &remote_refs);

        let mut expected = merged.clone();
        expected.sort();
        expected.dedup();
        prop_assert_eq!(&merged, &expected);

        for name in local.iter().chain(&remote) {
            prop_assert!(merged.contains(name));
        }
    }
}

#[test]
fn example_listing() {
    let raw = "worktree /repo/main\n\
HEAD abc123\n\
branch refs/heads/main\n\
\n\
worktree /repo/wt\n\
HEAD def456\n\
branch refs/heads/feature/x\n\
locked\n\
locked reason: busy\n";

    let parsed = parse_porcelain(raw);
    assert_eq!(parsed.len(), 2);

    assert_eq!(parsed[0].path(), "/repo/main");
    assert_eq!(parsed[0].branch(), Some("main"));
    assert!(parsed[0].is_main_worktree());

    assert_eq!(parsed[1].path(), "/repo/wt");
    assert_eq!(parsed[1].branch(), Some("feature/x"));
    assert!(parsed[1].is_locked());
    assert_eq!(parsed[1].lock_reason(), Some("busy"));
    assert!(!parsed[1].is_main_worktree());
}

#[test]
fn branch_merge_example() {
    let local = vec!["main".to_string(), "dev".to_string()];
    let remote = vec!["origin/main".to_string(), "origin/feature".to_string()];
    assert_eq!(
        command::merge_branch_lists(&local, &remote),
        vec!["dev", "feature", "main"]
    );
}
