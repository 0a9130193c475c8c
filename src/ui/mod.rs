//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware printing and worktree formatting
//!
//! Status messages go through here so quiet mode is honoured in one
//! place; command data (tables, JSON, porcelain) is printed directly.

pub mod output;
