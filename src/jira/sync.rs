//! Issue status synchronization.
//!
//! The review service says which [`Phase`] a branch is in, the configuration
//! names that phase for the issue's type, and the tracker moves the issue
//! there if it is not already.

use std::fmt;

use super::client::IssueTracker;
use super::issue::{Issue, Transition};
use crate::config::{ConfigError, Phase, StatusConfig, same_status};
use crate::review::ReviewService;

/// Result of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The review state implies no change (draft or closed pull request).
    Skipped,
    AlreadyAt { key: String, status: String },
    WouldTransition {
        key: String,
        from: String,
        to: String,
    },
    Transitioned { key: String, to: String },
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Skipped => Ok(()),
            SyncOutcome::AlreadyAt { key, status } => write!(f, "{key}: already {status}"),
            SyncOutcome::WouldTransition { key, from, to } => {
                write!(f, "{key}: {from} → {to} (dry run)")
            }
            SyncOutcome::Transitioned { key, to } => write!(f, "{key} → {to}"),
        }
    }
}

/// Bring issue `key` in line with the review state of `branch`.
///
/// A missing status configuration is an error; a review state that implies no
/// phase returns [`SyncOutcome::Skipped`] without contacting the tracker.
pub fn sync_status(
    key: &str,
    branch: Option<&str>,
    config: &StatusConfig,
    review: &dyn ReviewService,
    tracker: &dyn IssueTracker,
    dry_run: bool,
) -> anyhow::Result<SyncOutcome> {
    if !config.has_status_config() {
        return Err(ConfigError::NotConfigured.into());
    }

    let Some(phase) = review.phase_for_branch(branch)? else {
        log::info!("{key}: review state implies no change");
        return Ok(SyncOutcome::Skipped);
    };

    let issue = tracker.fetch_issue(key)?;
    let target = config.resolve(&issue.issue_type, phase)?.to_string();
    log::debug!(
        "{key}: phase {phase} resolves to {target} for {}",
        issue.issue_type
    );

    if same_status(&issue.status, &target) {
        return Ok(SyncOutcome::AlreadyAt {
            key: issue.key,
            status: target,
        });
    }

    if dry_run {
        return Ok(SyncOutcome::WouldTransition {
            key: issue.key,
            from: issue.status,
            to: target,
        });
    }

    tracker.set_status(&issue.key, &target)?;
    Ok(SyncOutcome::Transitioned {
        key: issue.key,
        to: target,
    })
}

/// Move a freshly fetched issue to the status configured for `phase`.
///
/// Returns the status the issue was moved to. `None` when no mapping exists
/// for the issue's type or the issue is already there.
pub fn transition_to_phase(
    tracker: &dyn IssueTracker,
    config: &StatusConfig,
    issue: &Issue,
    phase: Phase,
) -> anyhow::Result<Option<String>> {
    let target = match config.resolve(&issue.issue_type, phase) {
        Ok(target) => target.to_string(),
        Err(e) => {
            log::info!("{}: {e}", issue.key);
            return Ok(None);
        }
    };
    if same_status(&issue.status, &target) {
        log::info!("{}: already {target}", issue.key);
        return Ok(None);
    }
    tracker.set_status(&issue.key, &target)?;
    Ok(Some(target))
}

/// Concrete status named by a user argument.
///
/// A lowercase phase name with a mapping for `issue_type` resolves through the
/// configuration; anything else, including `Done` or an unmapped `review`, is
/// taken literally.
pub fn resolve_status_arg(config: &StatusConfig, issue_type: &str, arg: &str) -> String {
    let mapped = arg
        .parse::<Phase>()
        .ok()
        .filter(|phase| phase.as_ref() == arg)
        .and_then(|phase| config.resolve(issue_type, phase).ok());
    match mapped {
        Some(status) => status.to_string(),
        None => arg.to_string(),
    }
}

/// One line describing an available transition, annotated with its phase.
pub fn describe_transition(config: &StatusConfig, issue_type: &str, t: &Transition) -> String {
    match config.reverse(issue_type, &t.target.name) {
        Some(phase) => format!("{} → {} ({phase})", t.name, t.target.name),
        None => format!("{} → {}", t.name, t.target.name),
    }
}
