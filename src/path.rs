use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Suffix appended to the repository root to form the worktrees directory.
pub const WORKTREES_SUFFIX: &str = "-worktrees";

/// Get the user's home directory.
///
/// Uses the `home` crate which handles platform-specific detection:
/// - Unix: `$HOME` environment variable
/// - Windows: `USERPROFILE` or `HOMEDRIVE`/`HOMEPATH`
pub fn home_dir() -> Option<PathBuf> {
    home::home_dir()
}

/// Directory that holds every worktree of a repository: `${repo_root}-worktrees`.
pub fn worktrees_root(repo_root: &Path) -> PathBuf {
    let mut dir: OsString = repo_root.as_os_str().to_owned();
    dir.push(WORKTREES_SUFFIX);
    PathBuf::from(dir)
}

/// Canonical on-disk location of the worktree for `branch`.
///
/// Slashes in the branch name become nested directories, joined with the
/// platform separator: `feature/login` under `/r` is `/r-worktrees/feature/login`.
pub fn worktree_path(repo_root: &Path, branch: &str) -> PathBuf {
    branch
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(worktrees_root(repo_root), |path, part| path.join(part))
}

/// Format a filesystem path for user-facing output.
///
/// Replaces home directory prefix with `~` (e.g., `/Users/alex/projects/wt` -> `~/projects/wt`).
/// Paths outside home are returned unchanged.
pub fn format_path_for_display(path: &Path) -> String {
    if let Some(home) = home_dir()
        && let Ok(stripped) = path.strip_prefix(&home)
    {
        if stripped.as_os_str().is_empty() {
            return "~".to_string();
        }

        let mut display_path = PathBuf::from("~");
        display_path.push(stripped);
        return display_path.display().to_string();
    }

    path.display().to_string()
}
