//! Code review state, read through the GitHub CLI.
//!
//! Only what the status sync needs: does the branch have a pull request, and
//! if so is it a draft, open, merged or closed.

use std::io;
use std::path::PathBuf;

use serde::Deserialize;

use crate::config::Phase;
use crate::shell_exec::{Cmd, SharedRunner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    NotInstalled,
    /// Installed but not authenticated.
    NotConfigured,
    CommandFailed { command: String, error: String },
}

impl std::error::Error for ReviewError {}

impl std::fmt::Display for ReviewError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewError::NotInstalled => write!(f, "gh is not installed"),
            ReviewError::NotConfigured => {
                write!(f, "gh is not configured; run gh auth login")
            }
            ReviewError::CommandFailed { command, error } => {
                write!(f, "{command} failed: {}", error.trim())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrState {
    Open,
    Merged,
    Closed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub state: PrState,
    pub is_draft: bool,
}

/// Phase implied by a branch's pull request; `None` means leave the issue alone.
pub fn phase_for(pr: Option<&PullRequest>) -> Option<Phase> {
    match pr {
        None => Some(Phase::Working),
        Some(PullRequest { is_draft: true, .. }) => None,
        Some(PullRequest { state, .. }) => match state {
            PrState::Open => Some(Phase::Review),
            PrState::Merged => Some(Phase::Testing),
            PrState::Closed | PrState::Unknown => None,
        },
    }
}

pub trait ReviewService {
    /// The pull request for `branch`, or `None` when there is none.
    fn pull_request(&self, branch: &str) -> anyhow::Result<Option<PullRequest>>;

    /// Phase for the branch. A detached HEAD (`None`) counts as still working.
    fn phase_for_branch(&self, branch: Option<&str>) -> anyhow::Result<Option<Phase>> {
        let Some(branch) = branch else {
            return Ok(Some(Phase::Working));
        };
        let pr = self.pull_request(branch)?;
        log::debug!("pull request for {branch}: {pr:?}");
        Ok(phase_for(pr.as_ref()))
    }
}

/// `gh pr view` run non-interactively in the repository.
#[derive(Clone)]
pub struct GitHubCli {
    runner: SharedRunner,
    dir: PathBuf,
}

impl GitHubCli {
    pub fn new(runner: SharedRunner, dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            dir: dir.into(),
        }
    }
}

impl ReviewService for GitHubCli {
    fn pull_request(&self, branch: &str) -> anyhow::Result<Option<PullRequest>> {
        let cmd = Cmd::new("gh")
            .args(["pr", "view", branch, "--json", "state,isDraft"])
            .current_dir(&self.dir)
            .env("GH_PROMPT_DISABLED", "1")
            .env("NO_COLOR", "1")
            .context(branch);

        let output = match self.runner.run(&cmd) {
            Ok(output) => output,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ReviewError::NotInstalled.into());
            }
            Err(e) => {
                return Err(ReviewError::CommandFailed {
                    command: cmd.display(),
                    error: e.to_string(),
                }
                .into());
            }
        };

        if !output.success() {
            let stderr = output.stderr.to_lowercase();
            if stderr.contains("no pull requests found") {
                return Ok(None);
            }
            if stderr.contains("gh auth login") || stderr.contains("not logged in") {
                return Err(ReviewError::NotConfigured.into());
            }
            return Err(ReviewError::CommandFailed {
                command: cmd.display(),
                error: output.combined(),
            }
            .into());
        }

        let pr: PullRequest =
            serde_json::from_str(output.stdout.trim()).map_err(|e| ReviewError::CommandFailed {
                command: cmd.display(),
                error: format!("unexpected output: {e}"),
            })?;
        Ok(Some(pr))
    }
}
