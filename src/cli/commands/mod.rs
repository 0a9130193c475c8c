//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each handler:
//! 1. Opens a [`Session`](crate::cli::Session) for the current repository
//! 2. Calls [`WorktreeService`](crate::git::WorktreeService) operations
//! 3. Formats and displays output
//!
//! Handlers are async; `cli::run` drives them on a tokio runtime so that
//! independent git queries can overlap and Ctrl-C can cancel them.

mod add;
mod branches;
mod completion;
mod doctor;
mod list;
mod lock;
mod prune;
mod remove;
mod root;
mod status_cmd;

// Re-export command functions for testing and direct invocation
pub use add::{add, default_worktree_path};
pub use branches::branches;
pub use completion::completion;
pub use doctor::doctor;
pub use list::{list, ListFormat};
pub use lock::{lock, unlock};
pub use prune::prune;
pub use remove::{contains, find_worktree, remove};
pub use root::root;
pub use status_cmd::status;

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::List {
            json,
            porcelain,
            status,
        } => list::list(ctx, ListFormat::from_flags(json, porcelain), status).await,
        Command::Add {
            branch,
            path,
            create,
            base,
        } => add::add(ctx, &branch, path.as_deref(), create, base.as_deref()).await,
        Command::Remove { path, force } => remove::remove(ctx, &path, force).await,
        Command::Branches => branches::branches(ctx).await,
        Command::Status { path, json } => status_cmd::status(ctx, path.as_deref(), json).await,
        Command::Root => root::root(ctx).await,
        Command::Prune => prune::prune(ctx).await,
        Command::Lock { path, reason } => lock::lock(ctx, &path, reason.as_deref()).await,
        Command::Unlock { path } => lock::unlock(ctx, &path).await,
        Command::Doctor => doctor::doctor(ctx).await,
        Command::Completion { shell } => completion::completion(shell),
    }
}
