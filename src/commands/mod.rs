mod jira;
mod worktree;

pub(crate) use jira::{
    JiraNewArgs, handle_jira_config, handle_jira_new, handle_jira_status, handle_jira_sync,
};
pub(crate) use worktree::{handle_go, handle_list, handle_new, handle_remove, handle_tmux};

use std::path::PathBuf;

use worktrack::config::{self, StatusConfig};
use worktrack::git::Repository;
use worktrack::path::home_dir;

/// Load the layered status configuration for the current repository.
///
/// Outside a repository only the global file is read.
pub(crate) fn load_config(repo: &Repository) -> anyhow::Result<StatusConfig> {
    let repo_root: Option<PathBuf> = repo.repo_root().ok();
    let home = home_dir();
    Ok(config::load_layered(home.as_deref(), repo_root.as_deref())?)
}
