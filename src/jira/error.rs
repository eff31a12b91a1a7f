//! Issue tracker error types

use color_print::cformat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JiraError {
    /// A required credential variable is unset or empty.
    MissingEnv { name: &'static str },
    Unauthorized,
    NotFound { key: String },
    UnexpectedStatus { status: u16, url: String },
    /// The tracker answered with a body that could not be decoded.
    InvalidResponse { error: String },
    NoTransition { status: String },
    /// Transport failure: DNS, connection refused, TLS and the like.
    Request { error: String },
    /// No key given and none could be derived from the branch.
    NoIssueKey { branch: Option<String> },
}

impl std::error::Error for JiraError {}

impl std::fmt::Display for JiraError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JiraError::MissingEnv { name } => {
                write!(f, "{}", cformat!("<bold>{name}</> is not set"))
            }
            JiraError::Unauthorized => write!(
                f,
                "authentication failed; check JIRA_USER and JIRA_TOKEN"
            ),
            JiraError::NotFound { key } => {
                write!(f, "{}", cformat!("issue <bold>{key}</> not found"))
            }
            JiraError::UnexpectedStatus { status, url } => {
                write!(f, "unexpected status {status} from {url}")
            }
            JiraError::InvalidResponse { error } => write!(f, "invalid response: {error}"),
            JiraError::NoTransition { status } => {
                write!(f, "no transition to \"{status}\" available")
            }
            JiraError::Request { error } => write!(f, "request failed: {error}"),
            JiraError::NoIssueKey { branch: Some(branch) } => write!(
                f,
                "{}",
                cformat!("no issue key in branch <bold>{branch}</>; pass one explicitly")
            ),
            JiraError::NoIssueKey { branch: None } => {
                write!(f, "no issue key given and HEAD is detached")
            }
        }
    }
}
