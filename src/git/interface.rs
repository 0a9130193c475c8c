//! git::interface
//!
//! Worktree operations composed from the command builder, the process
//! runner and the porcelain parser.
//!
//! # Error Handling
//!
//! Every operation resolves to a value. Git-domain failures (git missing,
//! non-zero exit, timeout, cancellation) come back as
//! [`GitCommandError`]; only empty required arguments are rejected up
//! front, as [`GitCommandError::InvalidArgument`], before any process is
//! spawned.
//!
//! # Policy
//!
//! The service executes exactly what it is asked. Refusing to remove the
//! main worktree or the one the user is standing in is the caller's job.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//! use wtkit::git::WorktreeService;
//!
//! # async fn demo() {
//! let service = WorktreeService::default();
//! let cancel = CancellationToken::new();
//! match service.list_worktrees(Path::new("."), &cancel).await {
//!     Ok(worktrees) => {
//!         for wt in worktrees {
//!             println!("{} {}", wt.path(), wt.branch().unwrap_or("(detached)"));
//!         }
//!     }
//!     Err(err) => eprintln!("git failed ({}): {}", err.exit_code(), err),
//! }
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{AcquireError, Semaphore};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::command;
use super::error::{require_non_empty, GitCommandError, GitCommandResult, NO_EXIT_CODE};
use super::runner::{GitExecutor, GitRunner};
use crate::core::config::{Config, DEFAULT_STATUS_CONCURRENCY};
use crate::core::porcelain::parse_porcelain;
use crate::core::types::{Worktree, WorktreeStatus};

/// Request to create a worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddWorktree {
    /// Directory to create the worktree in
    pub path: PathBuf,
    /// Branch to check out (or create)
    pub branch: String,
    /// Create `branch` instead of checking out an existing one
    pub create_branch: bool,
    /// Start point for a new branch
    pub base_branch: Option<String>,
}

impl AddWorktree {
    /// Check out an existing branch into `path`.
    pub fn existing_branch(path: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            create_branch: false,
            base_branch: None,
        }
    }

    /// Create `branch` (optionally from `base`) and check it out into `path`.
    pub fn new_branch(
        path: impl Into<PathBuf>,
        branch: impl Into<String>,
        base: Option<String>,
    ) -> Self {
        Self {
            path: path.into(),
            branch: branch.into(),
            create_branch: true,
            base_branch: base,
        }
    }

    /// The git arguments for this request.
    ///
    /// A blank base branch is treated as absent.
    pub fn command_args(&self) -> Vec<String> {
        let path = path_arg(&self.path);
        if self.create_branch {
            let base = self
                .base_branch
                .as_deref()
                .filter(|b| !b.trim().is_empty());
            command::add_worktree_new_branch(&path, &self.branch, base)
        } else {
            command::add_worktree(&path, &self.branch)
        }
    }
}

/// Status lookup result for one worktree.
pub type StatusEntry = (PathBuf, GitCommandResult<WorktreeStatus>);

/// Async worktree operations over a [`GitExecutor`].
///
/// Cloning is cheap; clones share the executor.
#[derive(Clone)]
pub struct WorktreeService {
    executor: Arc<dyn GitExecutor>,
    status_concurrency: usize,
}

impl Default for WorktreeService {
    fn default() -> Self {
        Self::new(GitRunner::new())
    }
}

impl std::fmt::Debug for WorktreeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorktreeService")
            .field("status_concurrency", &self.status_concurrency)
            .finish_non_exhaustive()
    }
}

impl WorktreeService {
    /// Service over any executor.
    pub fn new(executor: impl GitExecutor + 'static) -> Self {
        Self {
            executor: Arc::new(executor),
            status_concurrency: DEFAULT_STATUS_CONCURRENCY,
        }
    }

    /// Service using a [`GitRunner`] and limits from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(GitRunner::from_config(config))
            .with_status_concurrency(config.status_concurrency())
    }

    /// Limit concurrent status queries (minimum 1).
    pub fn with_status_concurrency(mut self, limit: usize) -> Self {
        self.status_concurrency = limit.max(1);
        self
    }

    pub fn status_concurrency(&self) -> usize {
        self.status_concurrency
    }

    async fn run(
        &self,
        cwd: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> GitCommandResult<String> {
        self.executor.execute(cwd, args, cancel).await.into_result()
    }

    /// List worktrees of the repository at `repo`, main worktree first.
    pub async fn list_worktrees(
        &self,
        repo: &Path,
        cancel: &CancellationToken,
    ) -> GitCommandResult<Vec<Worktree>> {
        require_path(repo, "repository path")?;

        let stdout = self.run(repo, &command::list_worktrees(), cancel).await?;
        let worktrees = parse_porcelain(&stdout);
        debug!(count = worktrees.len(), "parsed worktree list");
        Ok(worktrees)
    }

    /// Create a worktree.
    pub async fn add_worktree(
        &self,
        repo: &Path,
        request: &AddWorktree,
        cancel: &CancellationToken,
    ) -> GitCommandResult {
        require_path(repo, "repository path")?;
        require_path(&request.path, "worktree path")?;
        require_non_empty(&request.branch, "branch name")?;

        self.run(repo, &request.command_args(), cancel)
            .await
            .map(|_| ())
    }

    /// Remove a worktree, optionally discarding local changes.
    pub async fn remove_worktree(
        &self,
        repo: &Path,
        worktree_path: &Path,
        force: bool,
        cancel: &CancellationToken,
    ) -> GitCommandResult {
        require_path(repo, "repository path")?;
        require_path(worktree_path, "worktree path")?;

        let args = command::remove_worktree(&path_arg(worktree_path), force);
        self.run(repo, &args, cancel).await.map(|_| ())
    }

    /// Drop registrations of worktrees whose directories are gone.
    pub async fn prune_worktrees(
        &self,
        repo: &Path,
        cancel: &CancellationToken,
    ) -> GitCommandResult {
        require_path(repo, "repository path")?;
        self.run(repo, &command::prune_worktrees(), cancel)
            .await
            .map(|_| ())
    }

    /// Protect a worktree from pruning and removal.
    pub async fn lock_worktree(
        &self,
        repo: &Path,
        worktree_path: &Path,
        reason: Option<&str>,
        cancel: &CancellationToken,
    ) -> GitCommandResult {
        require_path(repo, "repository path")?;
        require_path(worktree_path, "worktree path")?;

        let args = command::lock_worktree(&path_arg(worktree_path), reason);
        self.run(repo, &args, cancel).await.map(|_| ())
    }

    pub async fn unlock_worktree(
        &self,
        repo: &Path,
        worktree_path: &Path,
        cancel: &CancellationToken,
    ) -> GitCommandResult {
        require_path(repo, "repository path")?;
        require_path(worktree_path, "worktree path")?;

        let args = command::unlock_worktree(&path_arg(worktree_path));
        self.run(repo, &args, cancel).await.map(|_| ())
    }

    /// Top-level directory of the repository containing `path`.
    ///
    /// `None` when `path` is not inside a repository or git fails.
    pub async fn get_repository_root(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Option<PathBuf> {
        match self.run(path, &command::repository_root(), cancel).await {
            Ok(stdout) => {
                let root = stdout.trim();
                (!root.is_empty()).then(|| PathBuf::from(root))
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "not inside a git repository");
                None
            }
        }
    }

    /// Git directory shared by all worktrees of the repository at `path`.
    ///
    /// Linked worktrees report the main repository's `.git`, so this is
    /// the same from every worktree. `None` outside a repository.
    pub async fn get_common_dir(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Option<PathBuf> {
        match self.run(path, &command::common_dir(), cancel).await {
            Ok(stdout) => {
                let dir = stdout.trim();
                (!dir.is_empty()).then(|| path.join(dir))
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no git common dir");
                None
            }
        }
    }

    /// Output of `git --version`, trimmed. `None` if git cannot run.
    pub async fn git_version(&self, cancel: &CancellationToken) -> Option<String> {
        let cwd = std::env::temp_dir();
        self.run(&cwd, &command::version(), cancel)
            .await
            .ok()
            .map(|out| out.trim().to_string())
    }

    /// Whether a working git executable is available.
    pub async fn is_git_installed(&self, cancel: &CancellationToken) -> bool {
        self.git_version(cancel).await.is_some()
    }

    /// Local and remote branch names, merged and sorted.
    ///
    /// Both queries run concurrently. A failing remote query (for
    /// instance in a repository without remotes) degrades to the local
    /// list; a failing local query is returned as the error.
    pub async fn get_branches(
        &self,
        repo: &Path,
        cancel: &CancellationToken,
    ) -> GitCommandResult<Vec<String>> {
        require_path(repo, "repository path")?;

        let local_args = command::local_branches();
        let remote_args = command::remote_branches();
        let (local, remote) = tokio::join!(
            self.run(repo, &local_args, cancel),
            self.run(repo, &remote_args, cancel)
        );

        let local = command::branch_lines(&local?);
        let remote = match remote {
            Ok(stdout) => command::branch_lines(&stdout),
            Err(err) => {
                warn!(error = %err, "remote branch query failed, using local branches only");
                Vec::new()
            }
        };

        Ok(command::merge_branch_lists(&local, &remote))
    }

    /// Modified/untracked counts and upstream divergence for one worktree.
    pub async fn get_worktree_status(
        &self,
        worktree_path: &Path,
        cancel: &CancellationToken,
    ) -> GitCommandResult<WorktreeStatus> {
        require_path(worktree_path, "worktree path")?;

        let stdout = self.run(worktree_path, &command::status(), cancel).await?;
        Ok(WorktreeStatus::parse(&stdout))
    }

    /// Status for every worktree, in input order.
    ///
    /// At most [`status_concurrency`](Self::status_concurrency) queries
    /// run at once. Each entry succeeds or fails independently.
    pub async fn get_statuses(
        &self,
        worktrees: &[Worktree],
        cancel: &CancellationToken,
    ) -> Vec<StatusEntry> {
        let permits = Arc::new(Semaphore::new(self.status_concurrency));
        let mut tasks = JoinSet::new();

        let mut results: Vec<StatusEntry> = worktrees
            .iter()
            .map(|wt| {
                let lost = GitCommandError::CommandFailed {
                    exit_code: NO_EXIT_CODE,
                    message: "status task did not complete".to_string(),
                };
                (wt.path_buf(), Err(lost))
            })
            .collect();

        for (idx, worktree) in worktrees.iter().enumerate() {
            let service = self.clone();
            let permits = Arc::clone(&permits);
            let cancel = cancel.clone();
            let path = worktree.path_buf();

            tasks.spawn(async move {
                // Only fails once the semaphore is closed; this one never is
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(err) => return (idx, Err(limiter_unavailable(err))),
                };
                (idx, service.get_worktree_status(&path, &cancel).await)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, status)) => results[idx].1 = status,
                Err(err) => warn!(error = %err, "status task failed"),
            }
        }

        results
    }
}

/// Internal failure for a status task whose permit could not be taken.
fn limiter_unavailable(err: AcquireError) -> GitCommandError {
    GitCommandError::CommandFailed {
        exit_code: NO_EXIT_CODE,
        message: format!("status limiter unavailable: {err}"),
    }
}

fn require_path(path: &Path, name: &str) -> GitCommandResult {
    require_non_empty(&path.to_string_lossy(), name)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
