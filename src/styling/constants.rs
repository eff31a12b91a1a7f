//! Message prefixes and formatting functions.
//!
//! Semantic mapping:
//! - Errors: `error:` in bold red
//! - Warnings: `warning:` in bold yellow
//! - Hints: dim
//! - Success: green
//! - Progress: cyan

use std::fmt;

use color_print::{cformat, cstr};

/// Error prefix (bold red `error:`)
pub const ERROR_PREFIX: &str = cstr!("<red,bold>error:</>");

/// Warning prefix (bold yellow `warning:`)
pub const WARNING_PREFIX: &str = cstr!("<yellow,bold>warning:</>");

/// Hint prefix (dim `hint:`)
pub const HINT_PREFIX: &str = cstr!("<dim>hint:</>");

/// Success symbol (green ✓)
pub const SUCCESS_SYMBOL: &str = cstr!("<green>✓</>");

/// Progress symbol (cyan ◎)
pub const PROGRESS_SYMBOL: &str = cstr!("<cyan>◎</>");

/// A message that has already been formatted with its prefix and styling.
///
/// Message functions take `impl AsRef<str>` and return `FormattedMessage`.
/// Since `FormattedMessage` does NOT implement `AsRef<str>`, passing one to a
/// message function is a compile error, which rules out double prefixes.
///
/// ```compile_fail
/// use worktrack::styling::error_message;
///
/// let msg = error_message("first error");
/// let double = error_message(msg);
/// ```
#[derive(Debug, Clone)]
pub struct FormattedMessage(String);

impl FormattedMessage {
    /// Borrow the inner string for inspection (e.g., in tests).
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FormattedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Format an error message with the `error:` prefix
///
/// ```
/// use color_print::cformat;
/// use worktrack::styling::error_message;
///
/// let name = "feature";
/// println!("{}", error_message(cformat!("No worktree named <bold>{name}</>")));
/// ```
pub fn error_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(format!("{ERROR_PREFIX} {}", content.as_ref()))
}

/// Format a warning message with the `warning:` prefix
pub fn warning_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(format!("{WARNING_PREFIX} {}", content.as_ref()))
}

/// Format a hint message with dim styling
pub fn hint_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{HINT_PREFIX} <dim>{}</>", content.as_ref()))
}

/// Format a success message with symbol and green styling
pub fn success_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{SUCCESS_SYMBOL} <green>{}</>", content.as_ref()))
}

/// Format a progress message with symbol and cyan styling
pub fn progress_message(content: impl AsRef<str>) -> FormattedMessage {
    FormattedMessage(cformat!("{PROGRESS_SYMBOL} <cyan>{}</>", content.as_ref()))
}
