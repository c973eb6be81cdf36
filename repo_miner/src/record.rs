use crate::table::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[cfg(feature = "api")]
use crate::api::{Commit, Issue};
#[cfg(feature = "api")]
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Flat commit row. `author` and `email` are empty when the commit carries no author identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub sha: String,
    pub author: Option<String>,
    pub email: Option<String>,
    pub date: DateTime<Utc>,
    /// First line of the commit message.
    pub message: String,
}

impl Record for CommitRecord {
    const HEADERS: &'static [&'static str] = &["sha", "author", "email", "date", "message"];
}

/// Flat issue row.
///
/// `open_duration_day` is always expressed in whole days: from creation to closure for closed issues,
/// from creation to the moment of the fetch for open ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub user: Option<String>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub open_duration_day: i64,
    pub comments: u32,
}

impl Record for IssueRecord {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "number",
        "title",
        "user",
        "state",
        "created_at",
        "closed_at",
        "open_duration_day",
        "comments",
    ];
}

impl IssueRecord {
    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }
}

#[cfg(feature = "api")]
impl TryFrom<Commit> for CommitRecord {
    type Error = Error;

    fn try_from(commit: Commit) -> Result<Self> {
        let date = commit
            .author
            .as_ref()
            .or(commit.committer.as_ref())
            .map(|signature| signature.date)
            .ok_or_else(|| Error::MissingField {
                record: format!("Commit {}", commit.sha),
                field: "authorship date",
            })?;
        let (author, email) = match commit.author {
            Some(signature) => (Some(signature.name), Some(signature.email)),
            None => (None, None),
        };
        Ok(CommitRecord {
            sha: commit.sha,
            author,
            email,
            date,
            message: first_line(&commit.message).to_string(),
        })
    }
}

#[cfg(feature = "api")]
impl IssueRecord {
    /// Maps a listed issue, measuring open issues against `now`.
    pub fn from_issue(issue: Issue, now: DateTime<Utc>) -> Self {
        // Reopened issues may still report their previous closure.
        let closed_at = match issue.state {
            IssueState::Closed => issue.closed_at,
            IssueState::Open => None,
        };
        let open_duration_day = (closed_at.unwrap_or(now) - issue.created_at).num_days();
        IssueRecord {
            id: issue.id,
            number: issue.number,
            title: issue.title,
            user: issue.user,
            state: issue.state,
            created_at: issue.created_at,
            closed_at,
            open_duration_day,
            comments: issue.comments,
        }
    }
}

#[cfg(feature = "api")]
fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}
