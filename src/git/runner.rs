//! git::runner
//!
//! Process execution for git commands.
//!
//! # Lifecycle
//!
//! Every invocation moves through
//! `NotStarted -> Running -> {Completed, TimedOut, Cancelled, FailedToStart}`
//! and reaches exactly one terminal state, reported as a
//! [`ProcessOutcome`]. The timeout and the caller's cancellation token race
//! the process; whichever fires first kills the process tree and is
//! recorded as the outcome, so the two are never confused.
//!
//! # Logging
//!
//! Each call emits one `git command started` event, one completion event
//! (info when clean, warn when git wrote to stderr but succeeded or the
//! call was cancelled, error otherwise), and one error event per spawn or
//! I/O failure.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use wtkit::git::{command, GitRunner};
//!
//! # async fn demo() {
//! let runner = GitRunner::new().with_timeout(Duration::from_secs(5));
//! let outcome = runner
//!     .run(Path::new("."), &command::version(), &CancellationToken::new())
//!     .await;
//! println!("{:?}", outcome.into_result());
//! # }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::command;
use super::error::{GitCommandError, GitCommandResult, NO_EXIT_CODE};
use crate::core::config::Config;

/// Default limit for a single git invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(30_000);

/// Terminal state of one process execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process exited on its own.
    Completed {
        /// Exit code, or -1 when the process was killed by a signal
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    /// The timeout fired first; the process tree was killed.
    TimedOut,
    /// The cancellation token fired first; the process tree was killed.
    Cancelled,
    /// The executable could not be spawned.
    FailedToStart { message: String },
    /// Reading from or waiting on the running process failed.
    Faulted { message: String },
}

impl ProcessOutcome {
    /// Classify the outcome, yielding stdout on exit code 0.
    ///
    /// Stderr from a successful command is not an error; it only
    /// appears in the log.
    pub fn into_result(self) -> GitCommandResult<String> {
        match self {
            ProcessOutcome::Completed {
                exit_code: 0,
                stdout,
                ..
            } => Ok(stdout),
            ProcessOutcome::Completed {
                exit_code, stderr, ..
            } => {
                let stderr = stderr.trim();
                let message = if stderr.is_empty() {
                    format!("git exited with code {exit_code}")
                } else {
                    stderr.to_string()
                };
                Err(GitCommandError::CommandFailed { exit_code, message })
            }
            ProcessOutcome::TimedOut => Err(GitCommandError::TimedOut),
            ProcessOutcome::Cancelled => Err(GitCommandError::Cancelled),
            ProcessOutcome::FailedToStart { message } => {
                Err(GitCommandError::FailedToStart { message })
            }
            ProcessOutcome::Faulted { message } => Err(GitCommandError::CommandFailed {
                exit_code: NO_EXIT_CODE,
                message,
            }),
        }
    }
}

/// Something that can run git with an argument vector.
///
/// [`GitRunner`] is the real implementation; tests substitute canned
/// outcomes.
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Run git in `cwd` with `args`, honouring `cancel`.
    async fn execute(
        &self,
        cwd: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> ProcessOutcome;
}

/// Runs the git executable with a timeout.
///
/// No queuing happens here: concurrent calls each own their process.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
    timeout: Duration,
}

impl Default for GitRunner {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GitRunner {
    /// Runner for `git` on `PATH` with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner configured from loaded settings.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_program(config.git_path())
            .with_timeout(config.timeout())
    }

    /// Use a different executable.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute one command and report how it ended.
    pub async fn run(
        &self,
        cwd: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> ProcessOutcome {
        let command_line = command::display(args);
        info!(command = %command_line, cwd = %cwd.display(), "git command started");

        let outcome = if cancel.is_cancelled() {
            ProcessOutcome::Cancelled
        } else {
            self.spawn_and_wait(cwd, args, cancel, &command_line).await
        };

        self.log_completion(&command_line, &outcome);
        outcome
    }

    async fn spawn_and_wait(
        &self,
        cwd: &Path,
        args: &[String],
        cancel: &CancellationToken,
        command_line: &str,
    ) -> ProcessOutcome {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so the whole tree can be signalled at once
        #[cfg(unix)]
        cmd.process_group(0);

        let child = match cmd.spawn() {
            Ok(child) => child,
            Err(err) => {
                error!(command = %command_line, error = %err, "failed to start git");
                return ProcessOutcome::FailedToStart {
                    message: format!("failed to start {}: {}", self.program.display(), err),
                };
            }
        };

        let pid = child.id();
        let completion = collect_output(child);
        tokio::pin!(completion);

        tokio::select! {
            biased;

            result = &mut completion => match result {
                Ok((status, stdout, stderr)) => ProcessOutcome::Completed {
                    exit_code: status.code().unwrap_or(NO_EXIT_CODE),
                    stdout,
                    stderr,
                },
                Err(err) => {
                    error!(command = %command_line, error = %err, "error while reading git output");
                    ProcessOutcome::Faulted {
                        message: err.to_string(),
                    }
                }
            },
            _ = cancel.cancelled() => {
                kill_process_tree(pid);
                ProcessOutcome::Cancelled
            }
            _ = tokio::time::sleep(self.timeout) => {
                kill_process_tree(pid);
                ProcessOutcome::TimedOut
            }
        }
    }

    fn log_completion(&self, command_line: &str, outcome: &ProcessOutcome) {
        match outcome {
            ProcessOutcome::Completed {
                exit_code: 0,
                stdout,
                stderr,
            } => {
                if stderr.trim().is_empty() {
                    info!(command = %command_line, exit_code = 0, "git command completed");
                } else {
                    warn!(
                        command = %command_line,
                        exit_code = 0,
                        stderr = %stderr.trim(),
                        "git command completed with warnings"
                    );
                }
                debug!(command = %command_line, stdout = %stdout.trim_end(), "git stdout");
            }
            ProcessOutcome::Completed {
                exit_code, stderr, ..
            } => {
                error!(
                    command = %command_line,
                    exit_code = *exit_code,
                    stderr = %stderr.trim(),
                    "git command failed"
                );
            }
            ProcessOutcome::TimedOut => {
                error!(
                    command = %command_line,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "git command timed out"
                );
            }
            ProcessOutcome::Cancelled => {
                warn!(command = %command_line, "git command cancelled");
            }
            ProcessOutcome::FailedToStart { message } | ProcessOutcome::Faulted { message } => {
                error!(command = %command_line, exit_code = NO_EXIT_CODE, error = %message, "git command failed");
            }
        }
    }
}

#[async_trait]
impl GitExecutor for GitRunner {
    async fn execute(
        &self,
        cwd: &Path,
        args: &[String],
        cancel: &CancellationToken,
    ) -> ProcessOutcome {
        self.run(cwd, args, cancel).await
    }
}

/// Wait for exit while draining both pipes concurrently.
async fn collect_output(mut child: Child) -> io::Result<(ExitStatus, String, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), read_pipe(stdout), read_pipe(stderr))?;

    Ok((status, stdout, stderr))
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<String> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Best-effort kill of the child and everything it spawned.
///
/// The direct child is also killed when its handle drops.
fn kill_process_tree(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };

    #[cfg(unix)]
    {
        // SAFETY: kill(2) with a negative pid signals the process group
        // created by `process_group(0)`; it has no memory-safety effects.
        let rc = unsafe { libc::kill(-(pid as libc::pid_t), libc::SIGKILL) };
        if rc != 0 {
            debug!(pid, "process group already gone");
        }
    }

    #[cfg(windows)]
    {
        let spawned = std::process::Command::new("taskkill")
            .args(["/T", "/F", "/PID", &pid.to_string()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if spawned.is_err() {
            debug!(pid, "taskkill unavailable");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(exit_code: i32, stdout: &str, stderr: &str) -> ProcessOutcome {
        ProcessOutcome::Completed {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn success_yields_stdout() {
        assert_eq!(completed(0, "out\n", "").into_result(), Ok("out\n".to_string()));
    }

    #[test]
    fn success_with_stderr_is_still_success() {
        let result = completed(0, "", "Preparing worktree (new branch 'x')\n").into_result();
        assert_eq!(result, Ok(String::new()));
    }

    #[test]
    fn nonzero_exit_uses_trimmed_stderr() {
        let result = completed(128, "", "  fatal: 'x' is already checked out\n").into_result();
        assert_eq!(
            result,
            Err(GitCommandError::CommandFailed {
                exit_code: 128,
                message: "fatal: 'x' is already checked out".to_string(),
            })
        );
    }

    #[test]
    fn nonzero_exit_without_stderr_synthesizes_message() {
        let err = completed(2, "", " \n").into_result().unwrap_err();
        assert_eq!(err.to_string(), "git exited with code 2");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn process_failures_report_minus_one() {
        for outcome in [
            ProcessOutcome::TimedOut,
            ProcessOutcome::Cancelled,
            ProcessOutcome::FailedToStart {
                message: "No such file or directory".into(),
            },
            ProcessOutcome::Faulted {
                message: "broken pipe".into(),
            },
        ] {
            let err = outcome.into_result().unwrap_err();
            assert_eq!(err.exit_code(), -1);
        }
    }

    #[test]
    fn faulted_keeps_message() {
        let err = ProcessOutcome::Faulted {
            message: "broken pipe".into(),
        }
        .into_result()
        .unwrap_err();
        assert_eq!(err.to_string(), "broken pipe");
    }

    #[test]
    fn builder_settings() {
        let runner = GitRunner::new()
            .with_program("/usr/local/bin/git")
            .with_timeout(Duration::from_millis(250));
        assert_eq!(runner.program(), Path::new("/usr/local/bin/git"));
        assert_eq!(runner.timeout(), Duration::from_millis(250));
        assert_eq!(GitRunner::new().timeout(), DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn pre_cancelled_token_never_spawns() {
        let runner = GitRunner::new().with_program("definitely-not-a-real-binary-wtkit");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let outcome = runner
            .run(Path::new("."), &command::version(), &cancel)
            .await;
        assert_eq!(outcome, ProcessOutcome::Cancelled);
    }

    #[tokio::test]
    async fn missing_binary_fails_to_start() {
        let runner = GitRunner::new().with_program("definitely-not-a-real-binary-wtkit");
        let outcome = runner
            .run(Path::new("."), &command::version(), &CancellationToken::new())
            .await;
        match outcome {
            ProcessOutcome::FailedToStart { message } => {
                assert!(message.contains("definitely-not-a-real-binary-wtkit"));
            }
            other => panic!("expected FailedToStart, got {other:?}"),
        }
    }
}
