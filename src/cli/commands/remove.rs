//! remove command - Remove a worktree
//!
//! The core removes whatever it is asked to. This command adds the
//! guard rails: the main worktree and the worktree containing the
//! current directory are never removed.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use crate::cli::{Context, Session};
use crate::core::types::Worktree;
use crate::ui::output;

/// Remove the worktree at `path`.
pub async fn remove(ctx: &Context, path: &Path, force: bool) -> Result<()> {
    let session = Session::open(ctx).await?;
    let target = session.resolve(path);

    let worktrees = session
        .service
        .list_worktrees(&session.repo_root, &ctx.cancel)
        .await
        .context("failed to list worktrees")?;

    let Some(worktree) = find_worktree(&worktrees, &target) else {
        bail!("no worktree registered at {}", target.display());
    };

    if worktree.is_main_worktree() {
        bail!("refusing to remove the main worktree");
    }
    if contains(&worktree.path_buf(), &session.cwd) {
        bail!("refusing to remove the worktree you are currently in");
    }

    if worktree.is_locked() {
        let reason = worktree
            .lock_reason()
            .map(|r| format!(" ({r})"))
            .unwrap_or_default();
        output::warn(
            format!("worktree is locked{reason}; unlock it first if git refuses"),
            ctx.verbosity(),
        );
    }

    session
        .service
        .remove_worktree(&session.repo_root, &worktree.path_buf(), force, &ctx.cancel)
        .await
        .with_context(|| format!("failed to remove worktree {}", worktree.path()))?;

    output::print(
        format!("Removed worktree {}", worktree.path()),
        ctx.verbosity(),
    );
    Ok(())
}

/// Worktree whose path matches `target`, comparing canonical forms.
pub fn find_worktree<'a>(worktrees: &'a [Worktree], target: &Path) -> Option<&'a Worktree> {
    let target = normalize(target);
    worktrees
        .iter()
        .find(|wt| normalize(&wt.path_buf()) == target)
}

/// True if `inner` is `outer` or lies below it.
pub fn contains(outer: &Path, inner: &Path) -> bool {
    normalize(inner).starts_with(normalize(outer))
}

fn normalize(path: &Path) -> PathBuf {
    canonical(path).unwrap_or_else(|| path.to_path_buf())
}

/// Canonicalize, dropping the `\\?\` prefix Windows adds.
fn canonical(path: &Path) -> Option<PathBuf> {
    let canonical = path.canonicalize().ok()?;
    #[cfg(windows)]
    {
        let text = canonical.to_string_lossy();
        if let Some(stripped) = text.strip_prefix(r"\\?\") {
            return Some(PathBuf::from(stripped));
        }
    }
    Some(canonical)
}
