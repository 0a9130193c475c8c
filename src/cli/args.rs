//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--timeout-ms <ms>`: Per git command timeout

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// wt - manage git worktrees
#[derive(Parser, Debug)]
#[command(name = "wt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if wt was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Timeout for each git command, in milliseconds
    #[arg(long, global = true, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Timeout requested on the command line, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List worktrees of the current repository
    #[command(
        name = "list",
        visible_alias = "ls",
        after_help = "\
EXAMPLES:
    # Table view; * marks the main worktree
    wt list

    # Include modified/untracked counts and upstream divergence
    wt list --status

    # Machine-readable output
    wt list --json
    wt list --porcelain"
    )]
    List {
        /// Print JSON instead of a table
        #[arg(long, conflicts_with = "porcelain")]
        json: bool,

        /// Print git's porcelain format
        #[arg(long)]
        porcelain: bool,

        /// Fetch working-tree status for each worktree
        #[arg(short, long)]
        status: bool,
    },

    /// Create a worktree for a branch
    #[command(
        name = "add",
        after_help = "\
EXAMPLES:
    # Check out an existing branch next to the repository
    wt add feature-x

    # Create a new branch from main in an explicit directory
    wt add -b feature-y ../feature-y --base main"
    )]
    Add {
        /// Branch to check out (or create with --create)
        branch: String,

        /// Directory for the worktree (defaults to the configured worktree dir)
        path: Option<PathBuf>,

        /// Create the branch instead of checking out an existing one
        #[arg(short = 'b', long)]
        create: bool,

        /// Start point for the new branch
        #[arg(long, requires = "create")]
        base: Option<String>,
    },

    /// Remove a worktree
    #[command(name = "remove", visible_alias = "rm")]
    Remove {
        /// Path of the worktree to remove
        path: PathBuf,

        /// Remove even with uncommitted changes
        #[arg(short, long)]
        force: bool,
    },

    /// List local and remote branches available for worktrees
    Branches,

    /// Show working-tree status of a worktree
    Status {
        /// Worktree path (defaults to the current directory)
        path: Option<PathBuf>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the repository root
    Root,

    /// Remove registrations of worktrees whose directory is gone
    Prune,

    /// Lock a worktree so it is not pruned or removed
    Lock {
        /// Worktree path
        path: PathBuf,

        /// Reason to record with the lock
        #[arg(long)]
        reason: Option<String>,
    },

    /// Unlock a worktree
    Unlock {
        /// Worktree path
        path: PathBuf,
    },

    /// Check git availability and configuration
    Doctor,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_add_with_base() {
        let cli = Cli::try_parse_from(["wt", "add", "-b", "feature", "../f", "--base", "main"])
            .unwrap();
        match cli.command {
            Command::Add {
                branch,
                path,
                create,
                base,
            } => {
                assert_eq!(branch, "feature");
                assert_eq!(path, Some(PathBuf::from("../f")));
                assert!(create);
                assert_eq!(base.as_deref(), Some("main"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn base_requires_create() {
        assert!(Cli::try_parse_from(["wt", "add", "feature", "--base", "main"]).is_err());
    }

    #[test]
    fn global_timeout() {
        let cli = Cli::try_parse_from(["wt", "list", "--timeout-ms", "1500"]).unwrap();
        assert_eq!(cli.timeout(), Some(Duration::from_millis(1500)));
        assert!(Cli::try_parse_from(["wt", "list", "--timeout-ms", "0"]).is_err());
    }

    #[test]
    fn rm_alias() {
        let cli = Cli::try_parse_from(["wt", "rm", "--force", "/tmp/x"]).unwrap();
        assert!(matches!(cli.command, Command::Remove { force: true, .. }));
    }
}
