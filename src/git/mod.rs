//! git
//!
//! Everything that talks to the git executable.
//!
//! # Architecture
//!
//! - [`command`] builds argument vectors (pure)
//! - [`runner`] executes them with timeout and cancellation
//! - `interface` composes both with the porcelain parser into the
//!   operations callers use
//!
//! No other module spawns git. Arguments always travel as a vector, never
//! as a shell string.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use tokio_util::sync::CancellationToken;
//! use wtkit::git::{AddWorktree, WorktreeService};
//!
//! # async fn demo() {
//! let service = WorktreeService::default();
//! let cancel = CancellationToken::new();
//! let request = AddWorktree::new_branch("../wt-feature", "feature", Some("main".into()));
//! if let Err(err) = service.add_worktree(Path::new("."), &request, &cancel).await {
//!     eprintln!("{err}");
//! }
//! # }
//! ```

pub mod command;
mod error;
mod interface;
pub mod runner;

pub use error::{
    GitCommandError, GitCommandResult, CANCELLED_MESSAGE, NO_EXIT_CODE, TIMED_OUT_MESSAGE,
};
pub use interface::{AddWorktree, StatusEntry, WorktreeService};
pub use runner::{GitExecutor, GitRunner, ProcessOutcome, DEFAULT_TIMEOUT};
