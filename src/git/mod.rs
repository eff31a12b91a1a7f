//! Git operations and repository management
//!
//! The version-control adapter: every git invocation goes through
//! [`Repository`], which turns porcelain output into typed records.

use std::path::PathBuf;

mod error;
mod parse;
mod repository;

pub use error::GitError;
pub use repository::{Repository, find_worktree};

/// A worktree as reported by `git worktree list --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worktree {
    pub path: PathBuf,
    /// Short branch name; `None` for detached checkouts.
    pub branch: Option<String>,
}

impl Worktree {
    /// Branch name, or the empty string for detached checkouts.
    pub fn branch_name(&self) -> &str {
        self.branch.as_deref().unwrap_or_default()
    }

    /// Final path component, used for name matching and session names.
    pub fn dir_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}
