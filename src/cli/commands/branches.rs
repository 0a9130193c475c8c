//! branches command - Branch names available for new worktrees

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::ui::output;

/// Print local and remote branches, merged and sorted.
pub async fn branches(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx).await?;

    let names = session
        .service
        .get_branches(&session.repo_root, &ctx.cancel)
        .await
        .context("failed to list branches")?;

    if names.is_empty() {
        output::print("No branches found.", ctx.verbosity());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}
