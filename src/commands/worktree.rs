use std::collections::HashSet;

use color_print::cformat;
use worktrack::git::{GitError, Repository, Worktree, find_worktree};
use worktrack::path::format_path_for_display;
use worktrack::provision::{CopySpec, ProvisionOptions, provision, remove_worktree};
use worktrack::session::{launch_shell, open_tmux_session, shell_program};
use worktrack::styling::{eprintln, println, success_message};

use crate::cli::CopyArgs;

/// Handle `wt new`
pub fn handle_new(branch: &str, copy: &CopyArgs, from: Option<String>) -> anyhow::Result<()> {
    let repo = Repository::current();
    let options = ProvisionOptions {
        copy_config: copy.copy_config(),
        copy_libs: copy.copy_libs(),
        base: from,
    };

    let path = provision(&repo, branch, &options, &CopySpec::default())?;

    let path_display = format_path_for_display(&path);
    eprintln!(
        "{}",
        success_message(cformat!(
            "Created worktree for <bold>{branch}</> @ <bold>{path_display}</>"
        ))
    );
    println!("{}", path.display());
    Ok(())
}

/// Handle `wt list`
pub fn handle_list(long: bool, branches: bool) -> anyhow::Result<()> {
    let repo = Repository::current();
    let worktrees = repo.list_worktrees()?;

    for wt in &worktrees {
        let mut row = format_row(wt);
        if long {
            let state = if repo.status_clean(&wt.path)? {
                "clean"
            } else {
                "dirty"
            };
            let time = repo.commit_time(&wt.path.to_string_lossy());
            row.push_str(&format!("\t{state}\t{time}"));
        }
        println!("{row}");
    }

    if branches {
        let checked_out: HashSet<&str> = worktrees
            .iter()
            .filter_map(|wt| wt.branch.as_deref())
            .collect();
        for branch in repo.branches()? {
            if !checked_out.contains(branch.as_str()) {
                println!("{branch}");
            }
        }
    }
    Ok(())
}

/// `branch<TAB>path`, or the bare path for detached worktrees.
fn format_row(wt: &Worktree) -> String {
    match wt.branch.as_deref() {
        Some(branch) if !branch.is_empty() => format!("{branch}\t{}", wt.path.display()),
        _ => wt.path.display().to_string(),
    }
}

fn resolve(repo: &Repository, name: &str) -> anyhow::Result<Worktree> {
    let worktrees = repo.list_worktrees()?;
    if worktrees.is_empty() {
        return Err(GitError::NoWorktrees.into());
    }
    find_worktree(&worktrees, name)
        .cloned()
        .ok_or_else(|| {
            GitError::WorktreeNotFound {
                name: name.to_string(),
            }
            .into()
        })
}

/// Handle `wt go`
pub fn handle_go(name: &str) -> anyhow::Result<()> {
    let repo = Repository::current();
    let wt = resolve(&repo, name)?;

    let shell_env = std::env::var("SHELL").ok();
    let shell = shell_program(shell_env.as_deref());
    log::info!("launching {shell} in {}", wt.path.display());
    launch_shell(repo.runner(), shell, &wt.path)
}

/// Handle `wt t`
pub fn handle_tmux(name: &str) -> anyhow::Result<()> {
    let repo = Repository::current();
    let wt = resolve(&repo, name)?;

    let inside_tmux = std::env::var_os("TMUX").is_some_and(|v| !v.is_empty());
    open_tmux_session(repo.runner(), &wt.path, inside_tmux)?;
    Ok(())
}

/// Handle `wt remove`
pub fn handle_remove(name: &str, force: bool) -> anyhow::Result<()> {
    let repo = Repository::current();
    let path = remove_worktree(&repo, name, force)?;

    let path_display = format_path_for_display(&path);
    eprintln!(
        "{}",
        success_message(cformat!("Removed worktree <bold>{path_display}</>"))
    );
    println!("{}", path.display());
    Ok(())
}
