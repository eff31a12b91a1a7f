//! Terminal styling for status output.
//!
//! - anstream for auto-detecting color support
//! - color-print (`cformat!`) for inline styled messages
//!
//! ## stdout vs stderr principle
//!
//! - **stdout**: Primary data output (worktree paths, `wt list` rows,
//!   transition results)
//! - **stderr**: Status messages (progress, success, errors, hints, warnings)
//!
//! This separation allows `cd "$(wt new feature)"` and `wt list | grep foo`
//! without status messages interfering.

mod constants;
mod suggest;

// Re-exports from anstream (auto-detecting output)
pub use anstream::{eprint, eprintln, println};

pub use constants::*;
pub use suggest::suggest_command;
