//! git::error
//!
//! Failure values for git invocations.
//!
//! Every expected failure mode (git missing, non-zero exit, timeout,
//! cancellation) is a [`GitCommandError`] value, never a panic. A
//! successful call is `Ok(data)`, so a payload exists exactly when the
//! command exited with status 0.

use thiserror::Error;

/// Exit code reported when no real exit status exists.
pub const NO_EXIT_CODE: i32 = -1;

/// Message for commands that exceeded the configured timeout.
pub const TIMED_OUT_MESSAGE: &str = "Git command timed out";

/// Message for commands stopped by the caller's cancellation token.
pub const CANCELLED_MESSAGE: &str = "Git command was cancelled";

/// Errors from git command execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GitCommandError {
    /// The process could not be spawned (git not installed, permissions).
    #[error("{message}")]
    FailedToStart {
        /// The operating system's description of the failure
        message: String,
    },

    /// The command exceeded its timeout and was killed.
    #[error("Git command timed out")]
    TimedOut,

    /// The caller cancelled the command before it completed.
    #[error("Git command was cancelled")]
    Cancelled,

    /// The command ran but failed.
    ///
    /// Either git exited non-zero (`message` is the trimmed stderr) or
    /// reading the process failed unexpectedly (`exit_code` is -1).
    #[error("{message}")]
    CommandFailed {
        /// Process exit code, or -1 for I/O failures
        exit_code: i32,
        /// Trimmed stderr or the I/O error text
        message: String,
    },

    /// A required argument was empty; no process was spawned.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl GitCommandError {
    /// The exit code to report for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            GitCommandError::CommandFailed { exit_code, .. } => *exit_code,
            _ => NO_EXIT_CODE,
        }
    }

    /// True if the command never produced a real exit status.
    pub fn is_process_failure(&self) -> bool {
        self.exit_code() == NO_EXIT_CODE
    }
}

/// Result of a git command: `Ok(payload)` on exit code 0.
pub type GitCommandResult<T = ()> = Result<T, GitCommandError>;

/// Reject empty required arguments before spawning anything.
pub(crate) fn require_non_empty(value: &str, name: &str) -> GitCommandResult {
    if value.trim().is_empty() {
        return Err(GitCommandError::InvalidArgument(format!(
            "{name} must not be empty"
        )));
    }
    Ok(())
}
