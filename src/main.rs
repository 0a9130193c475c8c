//! wt - manage git worktrees

fn main() {
    if let Err(err) = wtkit::cli::run() {
        wtkit::ui::output::error(format!("{err:#}"));
        std::process::exit(1);
    }
}
