use std::io::Write;
use std::process;

use clap::Parser;
use log::LevelFilter;
use worktrack::styling::{eprintln, error_message};

mod cli;
mod commands;

use cli::{Cli, Commands, JiraCommand, StatusCommand};
use commands::{
    handle_go, handle_jira_config, handle_jira_new, handle_jira_status, handle_jira_sync,
    handle_list, handle_new, handle_remove, handle_tmux,
};

/// `-v` shows progress, `-vv` every external command. `RUST_LOG` overrides both.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level = record.level().to_string().to_lowercase();
            writeln!(buf, "[{level}] {}", record.args())
        })
        .init();
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::New { copy, from, branch } => handle_new(&branch, &copy, from),
        Commands::List { long, branches } => handle_list(long, branches),
        Commands::Go { name } => handle_go(&name),
        Commands::Tmux { name } => handle_tmux(&name),
        Commands::Remove { name, force } => handle_remove(&name, force),
        Commands::Jira { command } => match command {
            JiraCommand::New {
                copy,
                from,
                tmux,
                branch,
                no_status_update,
                key,
            } => handle_jira_new(commands::JiraNewArgs {
                key: &key,
                copy: &copy,
                from,
                branch,
                tmux,
                no_status_update,
            }),
            JiraCommand::Status(args) => match args.command {
                Some(StatusCommand::Sync { dry_run, key }) => handle_jira_sync(key, dry_run),
                None => handle_jira_status(args.key, args.status),
            },
            JiraCommand::Config { init, global, repo } => {
                handle_jira_config(init, global, repo)
            }
        },
    }
}

fn main() {
    // Usage errors exit 1 like every other failure; help and version exit 0.
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let code = if e.use_stderr() { 1 } else { 0 };
        let _ = e.print();
        process::exit(code);
    });
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("{}", error_message(format!("{e:#}")));
        process::exit(1);
    }
}
