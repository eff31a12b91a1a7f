//! Interactive sessions in a worktree: a subshell, or a tmux session.

use std::io;
use std::path::Path;

use anyhow::{Context, bail};

use crate::shell_exec::{Cmd, SharedRunner};

const FALLBACK_SHELL: &str = "/bin/sh";

/// Shell to launch: `$SHELL` when set and non-empty, else `/bin/sh`.
pub fn shell_program(shell_env: Option<&str>) -> &str {
    shell_env
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(FALLBACK_SHELL)
}

/// Run `shell` in `dir` attached to the terminal until it exits.
///
/// The shell's own exit status is not treated as a failure.
pub fn launch_shell(runner: &SharedRunner, shell: &str, dir: &Path) -> anyhow::Result<()> {
    let cmd = Cmd::new(shell).current_dir(dir);
    let status = runner
        .run_interactive(&cmd)
        .with_context(|| format!("Failed to launch {shell}"))?;
    log::debug!("{shell} exited with {status:?}");
    Ok(())
}

/// tmux session name for a worktree: its directory name, with the
/// characters tmux reserves in targets (`.` and `:`) replaced by `_`.
pub fn session_name(worktree: &Path) -> String {
    worktree
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .replace(['.', ':'], "_")
}

/// Open the tmux session for `worktree`, creating it if needed.
///
/// Inside tmux (`inside_tmux`) the client switches to the session; outside,
/// the terminal attaches to it. Returns the session name.
pub fn open_tmux_session(
    runner: &SharedRunner,
    worktree: &Path,
    inside_tmux: bool,
) -> anyhow::Result<String> {
    let name = session_name(worktree);
    if name.is_empty() {
        bail!("cannot derive a tmux session name from {}", worktree.display());
    }

    let has_session = Cmd::new("tmux")
        .args(["has-session", "-t"])
        .arg(format!("={name}"))
        .context(&name);
    let exists = match runner.run(&has_session) {
        Ok(output) => output.success(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => bail!("tmux is not installed"),
        Err(e) => return Err(e).context("Failed to run tmux"),
    };

    if !exists {
        let new_session = Cmd::new("tmux")
            .args(["new-session", "-d", "-s", &name, "-c"])
            .arg(worktree.to_string_lossy())
            .context(&name);
        let output = runner
            .run(&new_session)
            .context("Failed to run tmux")?;
        if !output.success() {
            bail!("{} failed: {}", new_session.display(), output.combined());
        }
        log::info!("created tmux session {name}");
    }

    if inside_tmux {
        let switch = Cmd::new("tmux").args(["switch-client", "-t", &name]);
        let output = runner.run(&switch).context("Failed to run tmux")?;
        if !output.success() {
            bail!("{} failed: {}", switch.display(), output.combined());
        }
    } else {
        let attach = Cmd::new("tmux").args(["attach-session", "-t", &name]);
        runner
            .run_interactive(&attach)
            .context("Failed to run tmux")?;
    }

    Ok(name)
}
