use clap::{Args, Subcommand};

use super::CopyArgs;

#[derive(Subcommand)]
pub(crate) enum JiraCommand {
    /// Create a worktree for an issue
    ///
    /// Fetches the issue, derives the branch from its key and summary, creates
    /// the worktree, writes `<KEY>.md` into it and moves the issue to the
    /// status configured for `working`.
    New {
        #[command(flatten)]
        copy: CopyArgs,

        /// Create the branch from this base
        #[arg(short = 'f', long = "from", value_name = "BASE")]
        from: Option<String>,

        /// Open a tmux session in the new worktree
        #[arg(short = 't', long)]
        tmux: bool,

        /// Branch name instead of the one derived from the issue
        #[arg(short = 'b', long, value_name = "NAME")]
        branch: Option<String>,

        /// Leave the issue status unchanged
        #[arg(short = 'S', long = "no-status-update")]
        no_status_update: bool,

        /// Issue key, e.g. PROJ-123
        key: String,
    },

    /// Show or change an issue's status
    ///
    /// Without arguments, shows the issue named by the current branch and its
    /// available transitions. STATUS may be a status name or a phase
    /// (working, review, testing, done).
    Status(StatusArgs),

    /// Show the status mapping, or create one with --init
    Config {
        /// Write a template configuration
        #[arg(long)]
        init: bool,

        /// Write to ~/.config/wt/config.json
        #[arg(long, requires = "init", conflicts_with = "repo")]
        global: bool,

        /// Write to <repo>/.wt.json
        #[arg(long, requires = "init")]
        repo: bool,
    },
}

#[derive(Args)]
#[command(args_conflicts_with_subcommands = true)]
pub(crate) struct StatusArgs {
    #[command(subcommand)]
    pub command: Option<StatusCommand>,

    /// Issue key (default: from the current branch)
    pub key: Option<String>,

    /// Status or phase to move the issue to
    pub status: Option<String>,
}

#[derive(Subcommand)]
pub(crate) enum StatusCommand {
    /// Move the issue to the status matching its pull request
    ///
    /// No pull request: working. Open: review. Merged: testing. Draft and
    /// closed pull requests leave the issue alone.
    Sync {
        /// Show what would change without changing it
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Issue key (default: from the current branch)
        key: Option<String>,
    },
}
