use crate::record::IssueState;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoId {
    type Err = Error;

    fn from_str(repo: &str) -> Result<Self> {
        match repo.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => Ok(RepoId {
                owner: owner.to_string(),
                name: name.to_string(),
            }),
            _ => Err(Error::InvalidRepository(repo.to_string())),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Server side filter of the issue listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StateFilter {
    All,
    Open,
    Closed,
}

pub trait Repo: Send + Sync {
    fn full_name(&self) -> &str;
}

/// Git identity block of a commit.
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    pub sha: String,
    pub author: Option<Signature>,
    pub committer: Option<Signature>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub user: Option<String>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments: u32,
    /// Set when the listed item is a pull request surfaced through the issue listing.
    pub pull_request: bool,
}

#[async_trait]
pub trait Client: Send + Sync {
    type Repo: Repo;

    const MAX_PAGE_SIZE: u32;
    const FIRST_PAGE_NUMBER: u32;

    async fn repository(&self, repo: &RepoId) -> Result<Self::Repo>;

    async fn commits(&self, repo: &Self::Repo, page: u32, per_page: u32) -> Result<Vec<Commit>>;

    async fn issues(&self, repo: &Self::Repo, state: StateFilter, page: u32, per_page: u32) -> Result<Vec<Issue>>;
}
