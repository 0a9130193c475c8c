//! add command - Create a worktree
//!
//! Without an explicit path the worktree goes into the configured
//! worktree directory, named after the branch (slashes become dashes).

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::git::AddWorktree;
use crate::ui::output;

/// Create a worktree for `branch`.
pub async fn add(
    ctx: &Context,
    branch: &str,
    path: Option<&Path>,
    create: bool,
    base: Option<&str>,
) -> Result<()> {
    let session = Session::open(ctx).await?;

    let target = match path {
        Some(path) => session.resolve(path),
        None => default_worktree_path(&session.config.worktree_dir(&session.main_root), branch),
    };

    let request = if create {
        AddWorktree::new_branch(&target, branch, base.map(str::to_string))
    } else {
        AddWorktree::existing_branch(&target, branch)
    };

    session
        .service
        .add_worktree(&session.repo_root, &request, &ctx.cancel)
        .await
        .with_context(|| format!("failed to add worktree for '{branch}'"))?;

    output::print(
        format!("Created worktree for '{}' at {}", branch, target.display()),
        ctx.verbosity(),
    );
    Ok(())
}

/// `<dir>/<branch>` with path separators in the branch flattened.
pub fn default_worktree_path(dir: &Path, branch: &str) -> PathBuf {
    dir.join(branch.replace(['/', '\\'], "-"))
}
