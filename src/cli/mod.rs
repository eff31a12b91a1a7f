mod jira;

pub(crate) use jira::{JiraCommand, StatusCommand};

use clap::builder::styling::{AnsiColor, Color, Styles};
use clap::{Args, Parser, Subcommand};

/// Custom styles for help output
fn help_styles() -> Styles {
    Styles::styled()
        .header(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .usage(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .literal(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
        )
        .placeholder(anstyle::Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
        .error(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
        )
        .invalid(
            anstyle::Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
        )
}

#[derive(Parser)]
#[command(name = "wt")]
#[command(about = "Git worktrees with issue-tracker status sync", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
#[command(styles = help_styles())]
#[command(arg_required_else_help = true)]
#[command(after_long_help = "\
Getting started

  wt new feature              # Create a worktree for branch `feature`
  wt list                     # Show all worktrees
  wt go feature               # Open a shell in it
  wt jira new PROJ-123        # Worktree for an issue, status moved to working
  wt jira status sync         # Align the issue with its pull request")]
pub(crate) struct Cli {
    /// Show progress (-v) or every external command (-vv)
    #[arg(
        long,
        short = 'v',
        global = true,
        action = clap::ArgAction::Count,
        display_order = 100,
        help_heading = "Global Options"
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which files to seed a new worktree with.
#[derive(Args, Debug, Clone, Default)]
pub(crate) struct CopyArgs {
    /// Copy config files (AGENTS.md, CLAUDE.md, .env) from the main worktree [default]
    #[arg(short = 'c', long = "copy-config", overrides_with = "no_copy_config")]
    copy_config: bool,

    /// Don't copy config files
    #[arg(short = 'C', long = "no-copy-config", overrides_with = "copy_config")]
    no_copy_config: bool,

    /// Copy dependency directories (node_modules)
    #[arg(short = 'l', long = "copy-libs", overrides_with = "no_copy_libs")]
    copy_libs: bool,

    /// Don't copy dependency directories [default]
    #[arg(short = 'L', long = "no-copy-libs", overrides_with = "copy_libs")]
    no_copy_libs: bool,
}

impl CopyArgs {
    pub fn copy_config(&self) -> bool {
        !self.no_copy_config
    }

    pub fn copy_libs(&self) -> bool {
        self.copy_libs && !self.no_copy_libs
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Create a worktree for a branch
    ///
    /// The worktree is placed at `<repo>-worktrees/<branch>`. An existing
    /// branch is checked out; otherwise the branch is created from HEAD, or
    /// from `--from`. Prints the worktree path.
    New {
        #[command(flatten)]
        copy: CopyArgs,

        /// Create the branch from this base
        #[arg(short = 'f', long = "from", value_name = "BASE")]
        from: Option<String>,

        /// Branch name
        branch: String,
    },

    /// List worktrees
    ///
    /// One line per worktree: `branch<TAB>path`, or just the path when detached.
    List {
        /// Add working tree state (clean/dirty) and last commit time
        #[arg(long)]
        long: bool,

        /// Also list local branches without a worktree
        #[arg(long)]
        branches: bool,
    },

    /// Open a shell in a worktree
    ///
    /// NAME matches a branch, a worktree directory name, or a full path.
    Go {
        /// Branch, directory name or path
        name: String,
    },

    /// Open or reattach the tmux session for a worktree
    #[command(name = "t")]
    Tmux {
        /// Branch, directory name or path
        name: String,
    },

    /// Remove a worktree
    #[command(visible_alias = "rm")]
    Remove {
        /// Branch, directory name or path
        name: String,

        /// Remove even with uncommitted changes
        #[arg(short, long)]
        force: bool,
    },

    /// Issue tracker commands
    Jira {
        #[command(subcommand)]
        command: JiraCommand,
    },
}
