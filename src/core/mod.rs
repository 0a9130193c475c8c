//! core
//!
//! Domain types, parsing, and configuration for wtkit.
//!
//! # Modules
//!
//! - [`types`] - Worktree and status records
//! - [`porcelain`] - `git worktree list --porcelain` parser and renderer
//! - [`config`] - Configuration schema and loading
//!
//! Nothing in here spawns processes; parsing is pure and deterministic.

pub mod config;
pub mod porcelain;
pub mod types;
