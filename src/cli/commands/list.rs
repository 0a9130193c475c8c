//! list command - Show the repository's worktrees
//!
//! Default output is an aligned table with `*` on the main worktree.
//! `--status` enriches each row with a bounded number of concurrent
//! `git status` queries; a failed lookup only affects its own row.

use anyhow::{Context as _, Result};

use crate::cli::{Context, Session};
use crate::core::porcelain::render_porcelain;
use crate::core::types::{Worktree, WorktreeStatus};
use crate::git::GitCommandResult;
use crate::ui::output::{self, format_worktree_table};

/// Output format for `wt list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFormat {
    Table,
    Json,
    Porcelain,
}

impl ListFormat {
    pub fn from_flags(json: bool, porcelain: bool) -> Self {
        if json {
            ListFormat::Json
        } else if porcelain {
            ListFormat::Porcelain
        } else {
            ListFormat::Table
        }
    }
}

/// List worktrees.
pub async fn list(ctx: &Context, format: ListFormat, with_status: bool) -> Result<()> {
    let session = Session::open(ctx).await?;

    let worktrees = session
        .service
        .list_worktrees(&session.repo_root, &ctx.cancel)
        .await
        .context("failed to list worktrees")?;

    let statuses: Option<Vec<GitCommandResult<WorktreeStatus>>> = if with_status {
        let entries = session.service.get_statuses(&worktrees, &ctx.cancel).await;
        Some(entries.into_iter().map(|(_, status)| status).collect())
    } else {
        None
    };

    match format {
        ListFormat::Porcelain => print!("{}", render_porcelain(&worktrees)),
        ListFormat::Json => println!("{}", to_json(&worktrees, statuses.as_deref())?),
        ListFormat::Table => {
            if worktrees.is_empty() {
                output::print("No worktrees found.", ctx.verbosity());
            } else {
                println!("{}", format_worktree_table(&worktrees, statuses.as_deref()));
            }
        }
    }

    Ok(())
}

/// JSON array of worktrees, each with a `status` field when requested.
fn to_json(
    worktrees: &[Worktree],
    statuses: Option<&[GitCommandResult<WorktreeStatus>]>,
) -> Result<String> {
    let mut values = Vec::with_capacity(worktrees.len());

    for (idx, worktree) in worktrees.iter().enumerate() {
        let mut value = serde_json::to_value(worktree)?;
        if let (Some(statuses), Some(object)) = (statuses, value.as_object_mut()) {
            let status = match statuses.get(idx) {
                Some(Ok(status)) => serde_json::to_value(status)?,
                Some(Err(err)) => serde_json::json!({ "error": err.to_string() }),
                None => serde_json::Value::Null,
            };
            object.insert("status".to_string(), status);
        }
        values.push(value);
    }

    Ok(serde_json::to_string_pretty(&values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::GitCommandError;

    #[test]
    fn format_flags() {
        assert_eq!(ListFormat::from_flags(false, false), ListFormat::Table);
        assert_eq!(ListFormat::from_flags(true, false), ListFormat::Json);
        assert_eq!(ListFormat::from_flags(false, true), ListFormat::Porcelain);
    }

    #[test]
    fn json_includes_fields() {
        let worktrees = vec![Worktree::new("/repo", "abc").with_branch("main")];
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&worktrees, None).unwrap()).unwrap();
        assert_eq!(json[0]["path"], "/repo");
        assert_eq!(json[0]["branch"], "main");
        assert_eq!(json[0]["is_locked"], false);
        assert!(json[0].get("status").is_none());
    }

    #[test]
    fn json_status_errors_inline() {
        let worktrees = vec![Worktree::new("/repo", "abc")];
        let statuses: Vec<GitCommandResult<WorktreeStatus>> = vec![Err(GitCommandError::TimedOut)];
        let json: serde_json::Value =
            serde_json::from_str(&to_json(&worktrees, Some(statuses.as_slice())).unwrap())
                .unwrap();
        assert_eq!(json[0]["status"]["error"], "Git command timed out");
        assert!(json[0]["branch"].is_null());
    }
}
