//! Git error types
//!
//! **`GitError`** is a typed enum for domain errors that can be pattern-matched
//! and tested. Use `.into()` to convert to `anyhow::Error` while preserving the
//! type for `downcast_ref`.

use std::path::PathBuf;

use color_print::cformat;

use crate::path::format_path_for_display;

/// Domain errors for git and worktree operations.
///
/// ```ignore
/// return Err(GitError::WorktreeNotFound { name: "feature".into() }.into());
///
/// if let Some(GitError::NotInRepository) = err.downcast_ref() {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitError {
    NotInRepository,
    NoWorktrees,
    WorktreeNotFound {
        name: String,
    },
    WorktreeRemovalFailed {
        path: PathBuf,
        error: String,
    },
    CannotRemoveMainWorktree,
    /// A git invocation exited non-zero; `command` is the full command line.
    CommandFailed {
        command: String,
        error: String,
    },
    ParseError {
        message: String,
    },
}

impl std::error::Error for GitError {}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::NotInRepository => write!(f, "not inside a git repository"),

            GitError::NoWorktrees => write!(f, "no worktrees found"),

            GitError::WorktreeNotFound { name } => {
                write!(f, "{}", cformat!("no worktree matching <bold>{name}</>"))
            }

            GitError::WorktreeRemovalFailed { path, error } => {
                let path_display = format_path_for_display(path);
                write!(
                    f,
                    "{}: {}",
                    cformat!("failed to remove worktree <bold>{path_display}</>"),
                    error.trim()
                )
            }

            GitError::CannotRemoveMainWorktree => {
                write!(f, "the main worktree cannot be removed")
            }

            GitError::CommandFailed { command, error } => {
                let error = error.trim();
                if error.is_empty() {
                    write!(f, "{}", cformat!("<bold>{command}</> failed"))
                } else {
                    write!(f, "{}: {error}", cformat!("<bold>{command}</> failed"))
                }
            }

            GitError::ParseError { message } => write!(f, "{message}"),
        }
    }
}
