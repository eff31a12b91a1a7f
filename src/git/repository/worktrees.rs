//! Worktree management operations for Repository.

use std::path::Path;

use normalize_path::NormalizePath;

use super::{GitError, Repository};
use crate::git::Worktree;

impl Repository {
    /// List all worktrees in git's order (main worktree first).
    pub fn list_worktrees(&self) -> anyhow::Result<Vec<Worktree>> {
        let stdout = self.run_command(&["worktree", "list", "--porcelain"])?;
        let worktrees = Worktree::parse_porcelain_list(&stdout)?;
        log::debug!("found {} worktree(s)", worktrees.len());
        Ok(worktrees)
    }

    /// The main worktree: the first entry git reports.
    pub fn main_worktree(&self) -> anyhow::Result<Worktree> {
        self.list_worktrees()?
            .into_iter()
            .next()
            .ok_or_else(|| GitError::NoWorktrees.into())
    }

    /// Create a worktree for `branch` at `path`.
    ///
    /// - with `base`: a new branch is created from it
    /// - existing branch: it is checked out
    /// - otherwise: a new branch is created from the current HEAD
    pub fn worktree_add(&self, path: &Path, branch: &str, base: Option<&str>) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy();

        if let Some(base) = base {
            self.run_command(&["worktree", "add", "-b", branch, &path_str, base])?;
        } else if self.branch_exists(branch)? {
            self.run_command(&["worktree", "add", &path_str, branch])?;
        } else {
            self.run_command(&["worktree", "add", "-b", branch, &path_str])?;
        }
        Ok(())
    }

    /// Remove the worktree at `path`; `force` discards uncommitted changes.
    pub fn worktree_remove(&self, path: &Path, force: bool) -> anyhow::Result<()> {
        let path_str = path.to_string_lossy();
        let mut args = vec!["worktree", "remove"];
        if force {
            args.push("--force");
        }
        args.push(&path_str);

        self.run_command(&args).map_err(|e| -> anyhow::Error {
            let error = match e.downcast_ref::<GitError>() {
                Some(GitError::CommandFailed { error, .. }) => error.clone(),
                _ => format!("{e:#}"),
            };
            GitError::WorktreeRemovalFailed {
                path: path.to_path_buf(),
                error,
            }
            .into()
        })?;
        Ok(())
    }
}

/// Find the worktree a user-supplied name refers to.
///
/// Tried in order: exact branch name, directory basename, full path. The
/// first worktree (in git's order) matching the earliest rule wins.
pub fn find_worktree<'a>(worktrees: &'a [Worktree], name: &str) -> Option<&'a Worktree> {
    if name.is_empty() {
        return None;
    }

    worktrees
        .iter()
        .find(|wt| wt.branch.as_deref() == Some(name))
        .or_else(|| worktrees.iter().find(|wt| wt.dir_name() == name))
        .or_else(|| {
            let wanted = Path::new(name).normalize();
            worktrees.iter().find(|wt| wt.path.normalize() == wanted)
        })
}
