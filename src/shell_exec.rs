//! External command execution
//!
//! Every subprocess worktrack spawns (git, gh, tmux, the user's shell) is
//! described by a [`Cmd`] and executed by a [`Runner`]. Production code uses
//! [`SystemRunner`]; unit tests substitute a scripted fake so that git and
//! review-service behaviour can be exercised without touching the host.
//!
//! ```text
//! $ git worktree list --porcelain [repo]     # with context
//! $ gh pr view feature --json state,isDraft  # without context
//! [wt-trace] context=repo cmd="..." dur=12.3ms ok=true
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::Instant;

/// A runner shared between the adapters of a single invocation.
pub type SharedRunner = Arc<dyn Runner + Send + Sync>;

/// The runner that spawns real processes.
pub fn system_runner() -> SharedRunner {
    Arc::new(SystemRunner)
}

/// Description of an external command: program, arguments, working
/// directory and environment adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Cmd {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
    context: Option<String>,
}

impl Cmd {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
            context: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Label shown next to the command in debug logs (usually a worktree name).
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// The command line as a single string, for logs and error messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }

    /// Run with the system runner and capture output.
    pub fn run(&self) -> io::Result<CmdOutput> {
        SystemRunner.run(self)
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmdOutput {
    /// Exit code, `None` when the process was terminated by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// stderr followed by stdout, trimmed, blank parts dropped.
    pub fn combined(&self) -> String {
        [self.stderr.trim(), self.stdout.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Executes [`Cmd`]s. The only way worktrack runs external programs.
pub trait Runner {
    /// Run to completion, capturing stdout and stderr.
    fn run(&self, cmd: &Cmd) -> io::Result<CmdOutput>;

    /// Run attached to the current terminal (stdin/stdout/stderr inherited)
    /// and return the exit code.
    fn run_interactive(&self, cmd: &Cmd) -> io::Result<Option<i32>>;
}

/// Spawns real processes, logging each invocation with its duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl Runner for SystemRunner {
    fn run(&self, cmd: &Cmd) -> io::Result<CmdOutput> {
        let cmd_str = cmd.display();
        log_start(&cmd_str, cmd.context.as_deref());

        let t0 = Instant::now();
        let result = cmd
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map(|output| CmdOutput {
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

        log_finish(
            &cmd_str,
            cmd.context.as_deref(),
            duration_ms,
            result.as_ref().map(CmdOutput::success),
        );
        result
    }

    fn run_interactive(&self, cmd: &Cmd) -> io::Result<Option<i32>> {
        let cmd_str = cmd.display();
        log_start(&cmd_str, cmd.context.as_deref());

        let t0 = Instant::now();
        let result = cmd.to_command().status().map(|status| status.code());
        let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

        log_finish(
            &cmd_str,
            cmd.context.as_deref(),
            duration_ms,
            result.as_ref().map(|code| *code == Some(0)),
        );
        result
    }
}

fn log_start(cmd_str: &str, context: Option<&str>) {
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }
}

fn log_finish(
    cmd_str: &str,
    context: Option<&str>,
    duration_ms: f64,
    result: Result<bool, &io::Error>,
) {
    let ctx = context
        .map(|ctx| format!("context={} ", ctx))
        .unwrap_or_default();
    match result {
        Ok(ok) => log::debug!(
            "[wt-trace] {}cmd=\"{}\" dur={:.1}ms ok={}",
            ctx,
            cmd_str,
            duration_ms,
            ok
        ),
        Err(e) => log::debug!(
            "[wt-trace] {}cmd=\"{}\" dur={:.1}ms err=\"{}\"",
            ctx,
            cmd_str,
            duration_ms,
            e
        ),
    }
}
