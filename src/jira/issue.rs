//! Issues as fetched from the tracker, and what worktrack derives from them.

use std::fmt::Write as _;

use regex::Regex;
use serde::Deserialize;

/// Longest slug appended to an issue key in a branch name.
const MAX_SLUG_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    /// Empty when the issue has no description.
    pub description: String,
    pub status: String,
    pub issue_type: String,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created: String,
}

/// A workflow edge the issue can take from its current status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    #[serde(rename = "to")]
    pub target: TransitionTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransitionTarget {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TransitionList {
    pub transitions: Vec<Transition>,
}

// Wire shapes of `GET /rest/api/2/issue/{key}`. Optional fields are often
// `null` rather than absent.

#[derive(Debug, Deserialize)]
pub(crate) struct RawIssue {
    #[serde(default)]
    key: String,
    fields: RawFields,
}

#[derive(Debug, Deserialize)]
struct RawFields {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<Named>,
    #[serde(default)]
    issuetype: Option<Named>,
    #[serde(default)]
    comment: Option<RawComments>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawComments {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(default)]
    author: Option<RawAuthor>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    created: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAuthor {
    #[serde(default)]
    display_name: String,
}

impl RawIssue {
    /// Flatten into an [`Issue`], falling back to `requested_key` when the
    /// response omits the key.
    pub(crate) fn into_issue(self, requested_key: &str) -> Issue {
        let fields = self.fields;
        let key = if self.key.is_empty() {
            requested_key.to_string()
        } else {
            self.key
        };
        Issue {
            key,
            summary: fields.summary.unwrap_or_default(),
            description: fields.description.unwrap_or_default(),
            status: fields.status.map(|s| s.name).unwrap_or_default(),
            issue_type: fields.issuetype.map(|t| t.name).unwrap_or_default(),
            comments: fields
                .comment
                .map(|c| c.comments)
                .unwrap_or_default()
                .into_iter()
                .map(|c| Comment {
                    author: c.author.map(|a| a.display_name).unwrap_or_default(),
                    body: c.body.unwrap_or_default(),
                    created: c.created.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl Issue {
    /// Branch name for this issue: the key plus a slug of the summary.
    pub fn branch_name(&self) -> String {
        branch_name(&self.key, &self.summary)
    }

    /// Markdown rendering written to `<worktree>/<KEY>.md`.
    pub fn render_markdown(&self) -> String {
        let mut out = format!("# {}: {}\n", self.key, self.summary);

        if !self.description.is_empty() {
            let _ = write!(out, "\n## Description\n\n{}\n", self.description);
        }

        if !self.comments.is_empty() {
            out.push_str("\n## Comments\n");
            for comment in &self.comments {
                let _ = write!(
                    out,
                    "\n### {} ({})\n{}\n",
                    comment.author,
                    comment.created,
                    comment.body
                );
            }
        }

        out
    }
}

/// Lower-case `text`, collapse every run of other characters into one hyphen
/// and cap the result at 50 characters without splitting a word.
pub fn slugify(text: &str) -> String {
    thread_local! {
        static NON_ALNUM: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    }

    let lower = text.to_lowercase();
    let slug = NON_ALNUM.with(|re| re.replace_all(&lower, "-").into_owned());
    let slug = slug.trim_matches('-');

    if slug.len() <= MAX_SLUG_LEN {
        return slug.to_string();
    }

    // The slug is ASCII, so byte offsets are character offsets.
    let truncated = &slug[..MAX_SLUG_LEN];
    let truncated = if slug.as_bytes()[MAX_SLUG_LEN] == b'-' {
        truncated
    } else {
        truncated
            .rfind('-')
            .map_or(truncated, |idx| &truncated[..idx])
    };
    truncated.trim_end_matches('-').to_string()
}

/// `KEY-slug`, or just `KEY` when the summary has nothing sluggable.
pub fn branch_name(key: &str, summary: &str) -> String {
    let slug = slugify(summary);
    if slug.is_empty() {
        key.to_string()
    } else {
        format!("{key}-{slug}")
    }
}

/// Leading issue key of a branch name (`PROJ-123-fix-login` gives `PROJ-123`).
pub fn issue_key_from_branch(branch: &str) -> Option<&str> {
    thread_local! {
        static ISSUE_KEY: Regex = Regex::new(r"^[A-Z]+-[0-9]+").unwrap();
    }
    ISSUE_KEY.with(|re| re.find(branch).map(|m| &branch[m.range()]))
}
