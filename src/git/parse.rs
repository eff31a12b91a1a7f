//! Git output parsing functions

use std::path::PathBuf;

use super::{GitError, Worktree};

impl Worktree {
    /// Parse `git worktree list --porcelain`.
    ///
    /// Records are paragraphs separated by blank lines. `worktree <path>` opens
    /// a record; `branch refs/heads/<name>` carries the branch. Order is
    /// preserved, so the main worktree stays first.
    pub(crate) fn parse_porcelain_list(output: &str) -> Result<Vec<Self>, GitError> {
        let mut worktrees = Vec::new();
        let mut current: Option<Worktree> = None;

        for line in output.lines() {
            if line.is_empty() {
                if let Some(wt) = current.take() {
                    worktrees.push(wt);
                }
                continue;
            }

            let (key, value) = match line.split_once(' ') {
                Some((k, v)) => (k, Some(v)),
                None => (line, None),
            };

            match key {
                "worktree" => {
                    let path = value.ok_or_else(|| GitError::ParseError {
                        message: "worktree line missing path".to_string(),
                    })?;
                    if let Some(wt) = current.take() {
                        worktrees.push(wt);
                    }
                    current = Some(Worktree {
                        path: PathBuf::from(path),
                        branch: None,
                    });
                }
                key => match (key, current.as_mut()) {
                    ("branch", Some(wt)) => {
                        let branch_ref = value.ok_or_else(|| GitError::ParseError {
                            message: "branch line missing ref".to_string(),
                        })?;
                        let branch = branch_ref
                            .strip_prefix("refs/heads/")
                            .unwrap_or(branch_ref)
                            .to_string();
                        wt.branch = Some(branch);
                    }
                    _ => {
                        // HEAD, bare, detached, locked, prunable carry nothing we use
                    }
                },
            }
        }

        // Output doesn't always end with a blank line
        if let Some(wt) = current {
            worktrees.push(wt);
        }

        Ok(worktrees)
    }
}

/// Parse a `%ct` commit timestamp; anything unparseable is 0.
pub(crate) fn parse_commit_time(output: &str) -> i64 {
    output.trim().parse().unwrap_or(0)
}
