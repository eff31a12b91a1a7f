//! Repository - git command execution for one repository.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;

use super::GitError;
use super::parse::parse_commit_time;
use crate::shell_exec::{Cmd, CmdOutput, SharedRunner, system_runner};

mod worktrees;

pub use worktrees::find_worktree;

/// Get a short display name for a path, used in logging context.
fn path_to_logging_context(path: &Path) -> String {
    if path.to_str() == Some(".") {
        ".".to_string()
    } else {
        path.file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(".")
            .to_string()
    }
}

/// Repository context for git operations.
///
/// Holds the directory git commands run in and the [`Runner`](crate::shell_exec::Runner)
/// that executes them, so tests can substitute a scripted runner.
///
/// # Examples
///
/// ```no_run
/// use worktrack::git::Repository;
///
/// let repo = Repository::current();
/// let root = repo.repo_root()?;
/// let worktrees = repo.list_worktrees()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Clone)]
pub struct Repository {
    path: PathBuf,
    runner: SharedRunner,
}

impl fmt::Debug for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Repository {
    /// Repository context for the current directory.
    pub fn current() -> Self {
        Self::at(".")
    }

    /// Repository context at the specified path, running real git.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::with_runner(path, system_runner())
    }

    pub fn with_runner(path: impl Into<PathBuf>, runner: SharedRunner) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    /// The directory commands run in.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn runner(&self) -> &SharedRunner {
        &self.runner
    }

    fn spawn(&self, dir: &Path, args: &[&str]) -> anyhow::Result<(Cmd, CmdOutput)> {
        let cmd = Cmd::new("git")
            .args(args.iter().copied())
            .current_dir(dir)
            .context(path_to_logging_context(dir));
        let output = self
            .runner
            .run(&cmd)
            .with_context(|| format!("Failed to execute: {}", cmd.display()))?;
        Ok((cmd, output))
    }

    /// Run a git command in the repository directory and return stdout.
    ///
    /// A non-zero exit becomes [`GitError::CommandFailed`] carrying the
    /// command line and git's output.
    pub fn run_command(&self, args: &[&str]) -> anyhow::Result<String> {
        self.run_command_in(&self.path, args)
    }

    /// Run a git command in `dir` (usually another worktree) and return stdout.
    pub fn run_command_in(&self, dir: &Path, args: &[&str]) -> anyhow::Result<String> {
        let (cmd, output) = self.spawn(dir, args)?;

        if !output.success() {
            for line in output.stderr.trim().lines() {
                log::debug!("  ! {}", line);
            }
            return Err(GitError::CommandFailed {
                command: cmd.display(),
                error: output.combined(),
            }
            .into());
        }

        Ok(output.stdout)
    }

    /// Absolute, canonical root of the repository (the main worktree's directory).
    ///
    /// Derived from the common git directory so that the answer is the same
    /// from the main checkout and from any linked worktree. When the common
    /// directory is not `<root>/.git` (submodules, `--separate-git-dir`), the
    /// main checkout's top level is asked for instead.
    pub fn repo_root(&self) -> anyhow::Result<PathBuf> {
        let (_, output) = self.spawn(
            &self.path,
            &[
                "rev-parse",
                "--path-format=absolute",
                "--git-common-dir",
                "--git-dir",
            ],
        )?;
        if !output.success() {
            log::debug!("rev-parse failed: {}", output.combined());
            return Err(GitError::NotInRepository.into());
        }

        let mut lines = output.stdout.lines().map(|line| PathBuf::from(line.trim()));
        let (Some(common_dir), Some(git_dir)) = (lines.next(), lines.next()) else {
            return Err(GitError::ParseError {
                message: format!("unexpected rev-parse output: {}", output.stdout.trim()),
            }
            .into());
        };

        let root = if common_dir.file_name().is_some_and(|name| name == ".git") {
            common_dir
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| GitError::ParseError {
                    message: format!("invalid git directory: {}", common_dir.display()),
                })?
        } else if git_dir == common_dir {
            // Main checkout; a bare repository has no top level
            self.show_toplevel()?.unwrap_or(common_dir)
        } else {
            self.main_worktree()?.path
        };

        // Resolves symlinks (e.g., macOS /var -> /private/var); keep the
        // reported path when the directory can't be resolved.
        Ok(dunce::canonicalize(&root).unwrap_or(root))
    }

    /// Check whether a local branch exists.
    ///
    /// `git show-ref --verify --quiet` exits 1 for a missing ref; that is
    /// `false`. Any other failure is an error.
    pub fn branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        let reference = format!("refs/heads/{branch}");
        let (cmd, output) =
            self.spawn(&self.path, &["show-ref", "--verify", "--quiet", &reference])?;
        match output.status {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(GitError::CommandFailed {
                command: cmd.display(),
                error: output.combined(),
            }
            .into()),
        }
    }

    /// Local branch names in git's order.
    pub fn branches(&self) -> anyhow::Result<Vec<String>> {
        let stdout = self.run_command(&["branch", "--format=%(refname:short)"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    /// True iff the worktree at `path` has no uncommitted changes.
    pub fn status_clean(&self, path: &Path) -> anyhow::Result<bool> {
        let stdout = self.run_command_in(path, &["status", "--porcelain"])?;
        Ok(stdout.trim().is_empty())
    }

    /// Committer time (Unix seconds) of the last commit of a ref or worktree path.
    ///
    /// Never fails: any problem yields 0.
    pub fn commit_time(&self, target: &str) -> i64 {
        let target_path = Path::new(target);
        let result = if target_path.is_dir() {
            self.run_command_in(target_path, &["log", "-1", "--format=%ct", "HEAD"])
        } else {
            self.run_command(&["log", "-1", "--format=%ct", target])
        };
        match result {
            Ok(stdout) => parse_commit_time(&stdout),
            Err(e) => {
                log::debug!("commit time for {target} unavailable: {e:#}");
                0
            }
        }
    }

    /// Top-level directory of the current checkout, `None` outside a work tree.
    fn show_toplevel(&self) -> anyhow::Result<Option<PathBuf>> {
        let (_, output) = self.spawn(&self.path, &["rev-parse", "--show-toplevel"])?;
        if !output.success() {
            log::debug!("no work tree: {}", output.combined());
            return Ok(None);
        }
        Ok(Some(PathBuf::from(output.stdout.trim())))
    }

    /// Branch checked out in the repository directory, or `None` when detached.
    pub fn current_branch(&self) -> anyhow::Result<Option<String>> {
        let stdout = self.run_command(&["branch", "--show-current"])?;
        let branch = stdout.trim();

        if branch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(branch.to_string()))
        }
    }
}
