//! Git worktree provisioning with issue-tracker status sync.
//!
//! The `wt` binary is the primary interface. The library holds the engine it
//! drives: the git adapter, the file replicator that seeds new worktrees, the
//! layered status configuration, the tracker client and the sync state
//! machine.
//!
//! The library API is not stable.

pub mod config;
pub mod copy;
pub mod git;
pub mod jira;
pub mod path;
pub mod provision;
pub mod review;
pub mod session;
pub mod shell_exec;
pub mod styling;
