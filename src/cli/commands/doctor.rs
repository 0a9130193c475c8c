//! doctor command - Report whether wtkit can do its job here
//!
//! Checks, in order: configuration loads, git runs, the working
//! directory is inside a repository. Every check is reported even when
//! an earlier one fails; the command fails if any check did.

use anyhow::{bail, Result};

use crate::cli::Context;
use crate::core::config::{main_worktree_root, Config};
use crate::git::WorktreeService;

pub async fn doctor(ctx: &Context) -> Result<()> {
    let cwd = ctx.cwd()?;
    let mut problems = 0;

    let config = match Config::load(None) {
        Ok(config) => {
            match config.global_config_loaded_from() {
                Some(path) => println!("config:   {}", path.display()),
                None => println!("config:   defaults (no config file)"),
            }
            config.with_timeout_override(ctx.timeout)
        }
        Err(err) => {
            println!("config:   error: {err}");
            problems += 1;
            Config::default().with_timeout_override(ctx.timeout)
        }
    };

    let service = WorktreeService::from_config(&config);

    match service.git_version(&ctx.cancel).await {
        Some(version) => println!("git:      {} ({})", version, config.git_path()),
        None => {
            println!("git:      not found (tried '{}')", config.git_path());
            problems += 1;
        }
    }

    match service.get_repository_root(&cwd, &ctx.cancel).await {
        Some(root) => {
            println!("repo:     {}", root.display());
            match service.get_common_dir(&root, &ctx.cancel).await {
                Some(git_dir) => match Config::load(Some(&git_dir)) {
                    Ok(repo_config) => {
                        if let Some(path) = repo_config.repo_config_loaded_from() {
                            println!("repo cfg: {}", path.display());
                        }
                        println!(
                            "worktree dir: {}",
                            repo_config
                                .worktree_dir(&main_worktree_root(&git_dir))
                                .display()
                        );
                    }
                    Err(err) => {
                        println!("repo cfg: error: {err}");
                        problems += 1;
                    }
                },
                None => {
                    println!("repo cfg: cannot locate git directory");
                    problems += 1;
                }
            }
        }
        None => {
            println!("repo:     not inside a git repository ({})", cwd.display());
            problems += 1;
        }
    }

    println!("timeout:  {} ms", config.timeout().as_millis());

    if problems > 0 {
        bail!("{problems} problem(s) found");
    }
    Ok(())
}
