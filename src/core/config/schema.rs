//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Global Config
//!
//! Located at (in order of precedence):
//! 1. `$WTKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/wtkit/config.toml`
//! 3. `~/.wtkit/config.toml`
//!
//! # Repo Config
//!
//! Located at `wtkit/config.toml` in the git common dir, which is the
//! main worktree's `.git` for every linked worktree too.
//!
//! # Validation
//!
//! Values are validated after parsing; a zero timeout or an out-of-range
//! concurrency limit is rejected rather than silently clamped.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Upper bound for concurrent status queries.
pub const MAX_STATUS_CONCURRENCY: usize = 64;

/// Global configuration (user scope).
///
/// # Example
///
/// ```toml
/// git_path = "/usr/local/bin/git"
/// timeout_ms = 30000
/// status_concurrency = 4
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Git executable to run
    pub git_path: Option<String>,

    /// Per-command timeout in milliseconds
    pub timeout_ms: Option<u64>,

    /// Maximum number of status queries in flight
    pub status_concurrency: Option<usize>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.git_path {
            if path.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "git_path cannot be empty".into(),
                ));
            }
        }

        if self.timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_ms must be greater than zero".into(),
            ));
        }

        if let Some(limit) = self.status_concurrency {
            if limit == 0 || limit > MAX_STATUS_CONCURRENCY {
                return Err(ConfigError::InvalidValue(format!(
                    "status_concurrency must be between 1 and {MAX_STATUS_CONCURRENCY}, got {limit}"
                )));
            }
        }

        Ok(())
    }
}

/// Repository configuration.
///
/// # Example
///
/// ```toml
/// worktree_dir = "../myrepo.worktrees"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepoConfig {
    /// Directory new worktrees are created under, relative to the repo root
    pub worktree_dir: Option<String>,
}

impl RepoConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(dir) = &self.worktree_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "worktree_dir cannot be empty".into(),
                ));
            }
        }
        Ok(())
    }
}
