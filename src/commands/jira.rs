use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use color_print::cformat;
use worktrack::config::{self, ConfigError, Phase, StatusConfig};
use worktrack::git::Repository;
use worktrack::jira::{
    IssueTracker, JiraClient, JiraError, describe_transition, issue_key_from_branch,
    resolve_status_arg, sync_status, transition_to_phase,
};
use worktrack::path::{format_path_for_display, home_dir};
use worktrack::provision::{CopySpec, ProvisionOptions, provision};
use worktrack::review::GitHubCli;
use worktrack::session::open_tmux_session;
use worktrack::styling::{
    eprint, eprintln, hint_message, println, progress_message, suggest_command, success_message,
    warning_message,
};

use super::load_config;
use crate::cli::CopyArgs;

pub struct JiraNewArgs<'a> {
    pub key: &'a str,
    pub copy: &'a CopyArgs,
    pub from: Option<String>,
    pub branch: Option<String>,
    pub tmux: bool,
    pub no_status_update: bool,
}

/// Handle `wt jira new`
pub fn handle_jira_new(args: JiraNewArgs<'_>) -> anyhow::Result<()> {
    let client = JiraClient::from_env()?;
    let key = args.key;
    eprintln!("{}", progress_message(cformat!("Fetching <bold>{key}</>...")));
    let issue = client.fetch_issue(key)?;
    let branch = args.branch.unwrap_or_else(|| issue.branch_name());
    log::info!("{}: {} ({})", issue.key, issue.summary, issue.status);

    let repo = Repository::current();
    let options = ProvisionOptions {
        copy_config: args.copy.copy_config(),
        copy_libs: args.copy.copy_libs(),
        base: args.from,
    };
    let path = provision(&repo, &branch, &options, &CopySpec::default())?;

    let issue_file = path.join(format!("{}.md", issue.key));
    fs::write(&issue_file, issue.render_markdown())
        .with_context(|| format!("Failed to write {}", issue_file.display()))?;

    let path_display = format_path_for_display(&path);
    eprintln!(
        "{}",
        success_message(cformat!(
            "Created worktree for <bold>{branch}</> @ <bold>{path_display}</>"
        ))
    );
    println!("{}", path.display());

    if !args.no_status_update {
        // Best effort: the worktree exists whatever happens here.
        match load_config(&repo)
            .and_then(|config| transition_to_phase(&client, &config, &issue, Phase::Working))
        {
            Ok(Some(target)) => println!("{} → {target}", issue.key),
            Ok(None) => {}
            Err(e) => eprintln!(
                "{}",
                warning_message(format!("could not update {}: {e:#}", issue.key))
            ),
        }
    }

    if args.tmux {
        let inside_tmux = std::env::var_os("TMUX").is_some_and(|v| !v.is_empty());
        open_tmux_session(repo.runner(), &path, inside_tmux)?;
    }
    Ok(())
}

/// Issue key from the argument, or from the current branch name.
fn resolve_key(repo: &Repository, key: Option<String>) -> anyhow::Result<String> {
    if let Some(key) = key {
        return Ok(key);
    }
    let branch = repo.current_branch()?;
    branch
        .as_deref()
        .and_then(issue_key_from_branch)
        .map(str::to_string)
        .ok_or_else(|| JiraError::NoIssueKey { branch }.into())
}

/// Handle `wt jira status [key] [status]`
pub fn handle_jira_status(key: Option<String>, status: Option<String>) -> anyhow::Result<()> {
    let repo = Repository::current();
    let key = resolve_key(&repo, key)?;
    let client = JiraClient::from_env()?;

    match status {
        Some(status) => {
            let config = load_config(&repo)?;
            let issue = client.fetch_issue(&key)?;
            let target = resolve_status_arg(&config, &issue.issue_type, &status);
            let transition = client.set_status(&issue.key, &target)?;
            println!("{} → {}", issue.key, transition.target.name);
        }
        None => {
            let config = load_config(&repo).unwrap_or_else(|e| {
                eprintln!("{}", warning_message(format!("{e:#}")));
                StatusConfig::default()
            });
            let issue = client.fetch_issue(&key)?;
            println!("{}: {}", issue.key, issue.status);
            for transition in client.transitions(&issue.key)? {
                println!(
                    "  {}",
                    describe_transition(&config, &issue.issue_type, &transition)
                );
            }
        }
    }
    Ok(())
}

/// Handle `wt jira status sync`
pub fn handle_jira_sync(key: Option<String>, dry_run: bool) -> anyhow::Result<()> {
    let repo = Repository::current();
    let key = resolve_key(&repo, key)?;

    let config = load_config(&repo)?;
    if !config.has_status_config() {
        return Err(ConfigError::NotConfigured.into());
    }

    let client = JiraClient::from_env()?;
    let review_dir = repo.repo_root().unwrap_or_else(|_| PathBuf::from("."));
    let review = GitHubCli::new(repo.runner().clone(), review_dir);
    let branch = repo.current_branch().unwrap_or_else(|e| {
        log::debug!("no current branch: {e:#}");
        None
    });

    let outcome = sync_status(
        &key,
        branch.as_deref(),
        &config,
        &review,
        &client,
        dry_run,
    )?;
    let line = outcome.to_string();
    if !line.is_empty() {
        println!("{line}");
    }
    Ok(())
}

/// Where `--init` writes the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitTarget {
    Global,
    Repo,
}

/// Handle `wt jira config`
pub fn handle_jira_config(init: bool, global: bool, repo_flag: bool) -> anyhow::Result<()> {
    let repo = Repository::current();

    if !init {
        let config = load_config(&repo)?;
        if !config.has_status_config() {
            eprintln!("{}", warning_message("no status mapping configured"));
            eprintln!(
                "{}",
                hint_message(suggest_command("jira config", &[], &["--init"]))
            );
            return Ok(());
        }
        for (scope, phase, status) in config.entries() {
            println!("{scope}.{phase}: {status}");
        }
        return Ok(());
    }

    let target = match (global, repo_flag) {
        (true, _) => InitTarget::Global,
        (_, true) => InitTarget::Repo,
        _ => prompt_target()?,
    };
    let path = match target {
        InitTarget::Global => {
            let home = home_dir().context("cannot determine home directory")?;
            config::global_config_path(&home)
        }
        InitTarget::Repo => config::repo_config_path(&repo.repo_root()?),
    };

    config::write_template(&path)?;
    let path_display = format_path_for_display(&path);
    eprintln!(
        "{}",
        success_message(cformat!("Created config at <bold>{path_display}</>"))
    );
    Ok(())
}

fn prompt_target() -> anyhow::Result<InitTarget> {
    eprint!("Write config to (g)lobal ~/.config/wt/config.json or (r)epo .wt.json? [g/r] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    match answer.trim().to_lowercase().as_str() {
        "g" | "global" => Ok(InitTarget::Global),
        "r" | "repo" => Ok(InitTarget::Repo),
        _ => anyhow::bail!("no config location chosen; pass --global or --repo"),
    }
}
