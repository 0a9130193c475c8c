//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! wtkit has two configuration scopes:
//! - **Global**: User-level settings (git binary, timeout, concurrency)
//! - **Repo**: Repository-level settings (where new worktrees go)
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. CLI flags (applied through [`Config::with_timeout_override`])
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$WTKIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/wtkit/config.toml`
//! 3. `~/.wtkit/config.toml`
//!
//! # Repo Config Location
//!
//! `wtkit/config.toml` inside the git common dir (`.git` of the main
//! worktree), so every linked worktree of a repository reads the same
//! file.
//!
//! # Example
//!
//! ```no_run
//! use wtkit::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Some(Path::new("/path/to/repo/.git"))).unwrap();
//! println!("git: {}", config.git_path());
//! println!("timeout: {:?}", config.timeout());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, RepoConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::git::runner::DEFAULT_TIMEOUT;

/// Default number of concurrent status queries.
pub const DEFAULT_STATUS_CONCURRENCY: usize = 4;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Merged configuration from all sources.
///
/// Accessors apply defaults, so callers never see a missing value.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: GlobalConfig,
    /// Repository configuration (if in a repo)
    pub repo: Option<RepoConfig>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
    /// Timeout from the command line
    timeout_override: Option<Duration>,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// If `git_common_dir` is provided, also loads repo-specific config.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be parsed or
    /// hold invalid values. Missing files are not an error.
    pub fn load(git_common_dir: Option<&Path>) -> Result<Config, ConfigError> {
        let (global, global_path) = match Self::global_candidates()
            .into_iter()
            .find(|path| path.exists())
        {
            Some(path) => (read_toml::<GlobalConfig>(&path)?, Some(path)),
            None => (GlobalConfig::default(), None),
        };

        let (repo, repo_path) = match git_common_dir.map(Self::repo_config_path) {
            Some(path) if path.exists() => (Some(read_toml::<RepoConfig>(&path)?), Some(path)),
            _ => (None, None),
        };

        global.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global,
            repo,
            global_path,
            repo_path,
            timeout_override: None,
        })
    }

    /// Global config locations, most specific first.
    fn global_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(path) = std::env::var("WTKIT_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("wtkit/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".wtkit/config.toml"));
        }

        candidates
    }

    /// Repo config file inside the git common dir.
    pub fn repo_config_path(git_common_dir: &Path) -> PathBuf {
        git_common_dir.join("wtkit/config.toml")
    }

    /// Apply a timeout given on the command line.
    pub fn with_timeout_override(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_override = timeout;
        self
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// Git executable. Defaults to `git` on `PATH`.
    pub fn git_path(&self) -> &str {
        self.global.git_path.as_deref().unwrap_or("git")
    }

    /// Per-command timeout. Defaults to 30 seconds.
    pub fn timeout(&self) -> Duration {
        self.timeout_override
            .or_else(|| self.global.timeout_ms.map(Duration::from_millis))
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Concurrent status query limit. Defaults to 4.
    pub fn status_concurrency(&self) -> usize {
        self.global
            .status_concurrency
            .unwrap_or(DEFAULT_STATUS_CONCURRENCY)
    }

    /// Directory for new worktrees, given the main worktree's root.
    ///
    /// Relative settings resolve against that root. Without a
    /// setting, worktrees go next to the repository in
    /// `../<repo-name>.worktrees`.
    pub fn worktree_dir(&self, main_root: &Path) -> PathBuf {
        match self.repo.as_ref().and_then(|r| r.worktree_dir.as_deref()) {
            Some(dir) => main_root.join(dir),
            None => {
                let name = main_root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "repo".to_string());
                main_root.join("..").join(format!("{name}.worktrees"))
            }
        }
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}

/// Root of the main worktree, given the git common dir.
///
/// `<main>/.git` maps to `<main>`; a bare repository has no checkout, so
/// its own directory stands in.
pub fn main_worktree_root(git_common_dir: &Path) -> PathBuf {
    match (git_common_dir.file_name(), git_common_dir.parent()) {
        (Some(name), Some(parent)) if name == ".git" => parent.to_path_buf(),
        _ => git_common_dir.to_path_buf(),
    }
}

fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_repo_config(git_dir: &Path, contents: &str) {
        let path = Config::repo_config_path(git_dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.git_path(), "git");
        assert_eq!(config.timeout(), Duration::from_millis(30_000));
        assert_eq!(config.status_concurrency(), 4);
    }

    #[test]
    fn load_repo_config() {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join(".git");
        write_repo_config(&git_dir, "worktree_dir = \"../trees\"\n");

        let config = Config::load(Some(&git_dir)).unwrap();

        assert_eq!(
            config.worktree_dir(temp.path()),
            temp.path().join("../trees")
        );
        assert_eq!(
            config.repo_config_loaded_from(),
            Some(temp.path().join(".git/wtkit/config.toml").as_path())
        );
    }

    #[test]
    fn main_root_from_common_dir() {
        assert_eq!(
            main_worktree_root(Path::new("/src/project/.git")),
            Path::new("/src/project")
        );
        assert_eq!(
            main_worktree_root(Path::new("/srv/project.git")),
            Path::new("/srv/project.git")
        );
    }

    #[test]
    fn missing_repo_config_is_fine() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(Some(temp.path())).unwrap();
        assert!(config.repo.is_none());
        assert!(config.repo_config_loaded_from().is_none());
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        write_repo_config(temp.path(), "worktree_dir = \"x\"\nbogus = 1\n");
        assert!(matches!(
            Config::load(Some(temp.path())),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn default_worktree_dir_is_sibling() {
        let config = Config::default();
        let root = Path::new("/src/project");
        assert_eq!(
            config.worktree_dir(root),
            Path::new("/src/project/../project.worktrees")
        );
    }

    #[test]
    fn cli_timeout_wins() {
        let config = Config {
            global: GlobalConfig {
                timeout_ms: Some(1000),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_millis(1000));

        let config = config.with_timeout_override(Some(Duration::from_millis(50)));
        assert_eq!(config.timeout(), Duration::from_millis(50));
    }
}
