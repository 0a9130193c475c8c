//! prune command - Forget worktrees whose directories were deleted

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::ui::output;

pub async fn prune(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx).await?;

    let before = session
        .service
        .list_worktrees(&session.repo_root, &ctx.cancel)
        .await
        .context("failed to list worktrees")?;
    let prunable = before.iter().filter(|wt| wt.is_prunable()).count();

    session
        .service
        .prune_worktrees(&session.repo_root, &ctx.cancel)
        .await
        .context("failed to prune worktrees")?;

    let message = match prunable {
        0 => "Nothing to prune.".to_string(),
        1 => "Pruned 1 stale worktree.".to_string(),
        n => format!("Pruned {n} stale worktrees."),
    };
    output::print(message, ctx.verbosity());
    Ok(())
}
