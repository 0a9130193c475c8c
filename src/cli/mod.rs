//! cli
//!
//! Command-line interface layer for wtkit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install logging
//! - Delegate to command handlers, which call [`crate::git::WorktreeService`]
//! - Apply caller-side policy the core leaves out (e.g. never removing the
//!   main worktree)
//!
//! # Cancellation
//!
//! Ctrl-C cancels the shared [`CancellationToken`], which kills whatever
//! git process is running and turns the command into a
//! "Git command was cancelled" error.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context as _, Result};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::core::config::{main_worktree_root, Config};
use crate::git::WorktreeService;
use crate::ui::output::Verbosity;

/// Settings shared by every command invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory override
    pub cwd: Option<PathBuf>,
    /// Debug logging requested
    pub debug: bool,
    /// Minimal output
    pub quiet: bool,
    /// Timeout override from the command line
    pub timeout: Option<Duration>,
    /// Cancels in-flight git commands
    pub cancel: CancellationToken,
}

impl Context {
    /// Directory commands run in.
    pub fn cwd(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(cwd) => Ok(cwd.clone()),
            None => std::env::current_dir().context("cannot determine current directory"),
        }
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }
}

/// A service bound to the repository the user is in.
#[derive(Debug)]
pub struct Session {
    pub service: WorktreeService,
    pub config: Config,
    /// Top level of the worktree containing the working directory
    pub repo_root: PathBuf,
    /// Root of the main worktree; the same from every linked worktree
    pub main_root: PathBuf,
    pub cwd: PathBuf,
}

impl Session {
    /// Locate the repository and load its configuration.
    ///
    /// # Errors
    ///
    /// Fails when the config is invalid or the working directory is not
    /// inside a git repository.
    pub async fn open(ctx: &Context) -> Result<Session> {
        let cwd = ctx.cwd()?;

        let config = Config::load(None)?.with_timeout_override(ctx.timeout);
        let bootstrap = WorktreeService::from_config(&config);

        let repo_root = bootstrap
            .get_repository_root(&cwd, &ctx.cancel)
            .await
            .ok_or_else(|| anyhow!("not a git repository: {}", cwd.display()))?;

        let git_dir = bootstrap
            .get_common_dir(&repo_root, &ctx.cancel)
            .await
            .ok_or_else(|| anyhow!("cannot locate git directory of {}", repo_root.display()))?;
        let main_root = main_worktree_root(&git_dir);

        let config = Config::load(Some(&git_dir))?.with_timeout_override(ctx.timeout);
        let service = WorktreeService::from_config(&config);

        Ok(Session {
            service,
            config,
            repo_root,
            main_root,
            cwd,
        })
    }

    /// Resolve a user-supplied path against the working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    let ctx = Context {
        cwd: cli.cwd.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
        timeout: cli.timeout(),
        cancel: CancellationToken::new(),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let cancel = ctx.cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        commands::dispatch(cli.command, &ctx).await
    })
}

/// Install the tracing subscriber on stderr.
///
/// `--debug` shows wtkit's debug events; otherwise `RUST_LOG` decides and
/// nothing is logged by default.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("wtkit=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
