//! status command - Working-tree status of one worktree

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::ui::output::format_status;

/// Show status for `path`, or for the current directory.
pub async fn status(ctx: &Context, path: Option<&Path>, json: bool) -> Result<()> {
    let session = Session::open(ctx).await?;
    let target = match path {
        Some(path) => session.resolve(path),
        None => session.cwd.clone(),
    };

    let status = session
        .service
        .get_worktree_status(&target, &ctx.cancel)
        .await
        .with_context(|| format!("failed to read status of {}", target.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("{}", format_status(&Ok(status)));
    }
    Ok(())
}
