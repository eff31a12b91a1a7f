//! HTTP client for the tracker's REST API (version 2).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::DeserializeOwned;
use ureq::http::Response;
use ureq::{Agent, Body};

use super::JiraError;
use crate::config::same_status;
use super::issue::{Issue, RawIssue, Transition, TransitionList};

/// Fields requested when fetching an issue.
const ISSUE_FIELDS: &str = "summary,description,comment,status,issuetype";

/// Tracker location and basic-auth credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub user: String,
    pub token: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl Credentials {
    /// Read `JIRA_URL`, `JIRA_USER` and `JIRA_TOKEN`. All three are required.
    pub fn from_env() -> Result<Self, JiraError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, JiraError> {
        let require = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or(JiraError::MissingEnv { name })
        };

        Ok(Self {
            base_url: require("JIRA_URL")?.trim_end_matches('/').to_string(),
            user: require("JIRA_USER")?,
            token: require("JIRA_TOKEN")?,
        })
    }

    fn authorization(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.user, self.token));
        format!("Basic {encoded}")
    }
}

/// Operations worktrack needs from an issue tracker.
pub trait IssueTracker {
    fn fetch_issue(&self, key: &str) -> anyhow::Result<Issue>;

    /// Transitions currently available for the issue.
    fn transitions(&self, key: &str) -> anyhow::Result<Vec<Transition>>;

    /// Apply the transition with `transition_id`.
    fn apply_transition(&self, key: &str, transition_id: &str) -> anyhow::Result<()>;

    /// Move the issue to `status` through the first transition leading there.
    ///
    /// Status names compare case-insensitively. Returns the transition taken.
    fn set_status(&self, key: &str, status: &str) -> anyhow::Result<Transition> {
        let transition = self
            .transitions(key)?
            .into_iter()
            .find(|t| same_status(&t.target.name, status))
            .ok_or_else(|| JiraError::NoTransition {
                status: status.to_string(),
            })?;

        log::debug!(
            "{key}: taking transition {} ({}) to {}",
            transition.id,
            transition.name,
            transition.target.name
        );
        self.apply_transition(key, &transition.id)?;
        Ok(transition)
    }
}

/// Blocking REST client.
pub struct JiraClient {
    credentials: Credentials,
    authorization: String,
    agent: Agent,
}

impl std::fmt::Debug for JiraClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl JiraClient {
    pub fn new(credentials: Credentials) -> Self {
        // Keep 4xx/5xx as responses so 401 and 404 get their own messages.
        let config = Agent::config_builder()
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();
        let authorization = credentials.authorization();
        Self {
            credentials,
            authorization,
            agent,
        }
    }

    /// Client configured from the environment.
    pub fn from_env() -> Result<Self, JiraError> {
        Credentials::from_env().map(Self::new)
    }

    fn issue_url(&self, key: &str) -> String {
        format!("{}/rest/api/2/issue/{key}", self.credentials.base_url)
    }

    fn transitions_url(&self, key: &str) -> String {
        format!("{}/transitions", self.issue_url(key))
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, key: &str) -> Result<T, JiraError> {
        log::debug!("GET {url}");
        let mut response = self
            .agent
            .get(url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .call()
            .map_err(request_error)?;
        check_status(&response, url, key)?;

        response
            .body_mut()
            .read_json::<T>()
            .map_err(|e| JiraError::InvalidResponse {
                error: e.to_string(),
            })
    }
}

impl IssueTracker for JiraClient {
    fn fetch_issue(&self, key: &str) -> anyhow::Result<Issue> {
        let url = format!("{}?fields={ISSUE_FIELDS}", self.issue_url(key));
        let raw: RawIssue = self.get_json(&url, key)?;
        Ok(raw.into_issue(key))
    }

    fn transitions(&self, key: &str) -> anyhow::Result<Vec<Transition>> {
        let list: TransitionList = self.get_json(&self.transitions_url(key), key)?;
        Ok(list.transitions)
    }

    fn apply_transition(&self, key: &str, transition_id: &str) -> anyhow::Result<()> {
        let url = self.transitions_url(key);
        log::debug!("POST {url} (transition {transition_id})");
        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.authorization)
            .header("Accept", "application/json")
            .send_json(serde_json::json!({ "transition": { "id": transition_id } }))
            .map_err(request_error)?;
        check_status(&response, &url, key)?;
        Ok(())
    }
}

fn request_error(error: ureq::Error) -> JiraError {
    JiraError::Request {
        error: error.to_string(),
    }
}

fn check_status(response: &Response<Body>, url: &str, key: &str) -> Result<(), JiraError> {
    match response.status().as_u16() {
        200..=299 => Ok(()),
        401 => Err(JiraError::Unauthorized),
        404 => Err(JiraError::NotFound {
            key: key.to_string(),
        }),
        status => Err(JiraError::UnexpectedStatus {
            status,
            url: url.to_string(),
        }),
    }
}
