//! Worktree provisioning: create the checkout, then seed it from the main worktree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::copy::{copy_items, copy_matching_files};
use crate::git::{GitError, Repository, find_worktree};
use crate::path::{worktree_path, worktrees_root};

/// Names replicated from the main worktree into new worktrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopySpec {
    /// Top-level files or directories copied when present.
    pub config_items: Vec<String>,
    /// Basenames matched anywhere in the tree.
    pub recursive_basenames: Vec<String>,
    /// Large top-level directories, copied only on request.
    pub library_items: Vec<String>,
}

impl Default for CopySpec {
    fn default() -> Self {
        Self {
            config_items: vec!["AGENTS.md".into(), "CLAUDE.md".into()],
            recursive_basenames: vec![".env".into()],
            library_items: vec!["node_modules".into()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    pub copy_config: bool,
    pub copy_libs: bool,
    /// Create the branch from this base instead of the current HEAD.
    pub base: Option<String>,
}

impl Default for ProvisionOptions {
    fn default() -> Self {
        Self {
            copy_config: true,
            copy_libs: false,
            base: None,
        }
    }
}

/// Create the worktree for `branch` under `${repo_root}-worktrees` and return its path.
///
/// Failures surface as-is; a partially created worktree is left in place.
pub fn provision(
    repo: &Repository,
    branch: &str,
    options: &ProvisionOptions,
    spec: &CopySpec,
) -> anyhow::Result<PathBuf> {
    let repo_root = repo.repo_root()?;
    let main = repo.main_worktree()?;
    let target = worktree_path(&repo_root, branch);
    log::debug!(
        "provisioning {branch} at {} from {}",
        target.display(),
        main.path.display()
    );

    if let Some(parent) = target.parent() {
        create_parent_dir(parent)?;
    }

    repo.worktree_add(&target, branch, options.base.as_deref())
        .with_context(|| format!("Failed to create worktree for {branch}"))?;

    if options.copy_config {
        copy_items(&main.path, &target, &as_strs(&spec.config_items))?;
        copy_matching_files(&main.path, &target, &as_strs(&spec.recursive_basenames))?;
    }
    if options.copy_libs {
        copy_items(&main.path, &target, &as_strs(&spec.library_items))?;
    }

    log::info!("created worktree {} for {branch}", target.display());
    Ok(target)
}

/// Remove the worktree `name` refers to and return its path.
///
/// After git removes the worktree, any directory left behind is deleted and
/// empty parent directories are pruned up to (not including)
/// `${repo_root}-worktrees`. The main worktree is never removed.
pub fn remove_worktree(repo: &Repository, name: &str, force: bool) -> anyhow::Result<PathBuf> {
    let worktrees = repo.list_worktrees()?;
    let main = worktrees.first().ok_or(GitError::NoWorktrees)?;
    let worktree = find_worktree(&worktrees, name).ok_or_else(|| GitError::WorktreeNotFound {
        name: name.to_string(),
    })?;
    if worktree.path == main.path {
        return Err(GitError::CannotRemoveMainWorktree.into());
    }

    let path = worktree.path.clone();
    repo.worktree_remove(&path, force)?;

    if path.exists() {
        fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to delete {}", path.display()))?;
    }

    let root = worktrees_root(&repo.repo_root()?);
    prune_empty_parents(&path, &root);

    log::info!("removed worktree {}", path.display());
    Ok(path)
}

/// Delete empty directories between `path` and `stop`, innermost first.
fn prune_empty_parents(path: &Path, stop: &Path) {
    let mut current = path.parent();
    while let Some(dir) = current {
        if dir == stop || !dir.starts_with(stop) {
            break;
        }
        // Fails on non-empty directories, which ends the walk.
        if fs::remove_dir(dir).is_err() {
            break;
        }
        log::debug!("pruned {}", dir.display());
        current = dir.parent();
    }
}

fn as_strs(items: &[String]) -> Vec<&str> {
    items.iter().map(String::as_str).collect()
}

fn create_parent_dir(dir: &Path) -> anyhow::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder
        .create(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))
}
