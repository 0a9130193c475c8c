//! wtkit - manage git worktrees from the command line or as a library
//!
//! wtkit drives `git worktree` through the git executable: it builds
//! argument vectors, runs git with a timeout and cooperative
//! cancellation, and parses the porcelain listing into typed records.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, applies policy)
//! - [`git`] - Command builder, process runner, and worktree operations
//! - [`core`] - Domain types, porcelain parser, configuration
//! - [`ui`] - Output formatting
//!
//! # Failure Model
//!
//! Git-domain failures are values: every operation returns a
//! [`git::GitCommandResult`] (or a plain `bool`/`Option` for lookups
//! such as the install check) and never panics on a missing git, a non-zero exit, a timeout, or a
//! cancellation.

pub mod cli;
pub mod core;
pub mod git;
pub mod ui;
