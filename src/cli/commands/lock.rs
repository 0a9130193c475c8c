//! lock/unlock commands - Protect a worktree from pruning and removal

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::ui::output;

/// Lock the worktree at `path`.
pub async fn lock(ctx: &Context, path: &Path, reason: Option<&str>) -> Result<()> {
    let session = Session::open(ctx).await?;
    let target = session.resolve(path);

    session
        .service
        .lock_worktree(&session.repo_root, &target, reason, &ctx.cancel)
        .await
        .with_context(|| format!("failed to lock {}", target.display()))?;

    output::print(format!("Locked {}", target.display()), ctx.verbosity());
    Ok(())
}

/// Unlock the worktree at `path`.
pub async fn unlock(ctx: &Context, path: &Path) -> Result<()> {
    let session = Session::open(ctx).await?;
    let target = session.resolve(path);

    session
        .service
        .unlock_worktree(&session.repo_root, &target, &ctx.cancel)
        .await
        .with_context(|| format!("failed to unlock {}", target.display()))?;

    output::print(format!("Unlocked {}", target.display()), ctx.verbosity());
    Ok(())
}
