//! Issue tracker integration
//!
//! Credentials come from `JIRA_URL`, `JIRA_USER` and `JIRA_TOKEN`.

mod client;
mod error;
mod issue;
mod sync;

pub use client::{Credentials, IssueTracker, JiraClient};
pub use error::JiraError;
pub use issue::{
    Comment, Issue, Transition, TransitionTarget, branch_name, issue_key_from_branch, slugify,
};
pub use sync::{
    SyncOutcome, describe_transition, resolve_status_arg, sync_status, transition_to_phase,
};
