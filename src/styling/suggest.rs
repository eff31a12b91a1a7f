//! Command suggestion helpers for hint messages.
//!
//! Build copy-pasteable commands for user suggestions:
//!
//! ```
//! use worktrack::styling::suggest_command;
//!
//! // Flags come first; a branch starting with a dash gets a -- separator
//! let cmd = suggest_command("remove", &["-bugfix"], &["--force"]);
//! assert_eq!(cmd, "wt remove --force -- -bugfix");
//!
//! // Spaces are quoted
//! let cmd = suggest_command("go", &["my feature"], &[]);
//! assert_eq!(cmd, "wt go 'my feature'");
//! ```

use shell_escape::escape;
use std::borrow::Cow;

/// Build a suggested command string for hints, e.g. `wt jira config --init`.
///
/// `subcommand` may contain several words (`"jira config"`). Positional
/// arguments follow the flags, shell-escaped, with a `--` separator before the
/// first one that starts with `-`.
pub fn suggest_command(subcommand: &str, args: &[&str], flags: &[&str]) -> String {
    let mut parts = vec!["wt".to_string(), subcommand.to_string()];
    parts.extend(flags.iter().map(|s| s.to_string()));

    let needs_separator = args.iter().any(|arg| arg.starts_with('-'));
    let mut separator_inserted = false;

    for arg in args {
        if needs_separator && arg.starts_with('-') && !separator_inserted {
            parts.push("--".to_string());
            separator_inserted = true;
        }
        parts.push(escape(Cow::Borrowed(*arg)).into_owned());
    }

    parts.join(" ")
}
