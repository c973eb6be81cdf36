use chrono::{DateTime, Utc};
use repo_miner::api;
use repo_miner::IssueState;
use serde::de::IgnoredAny;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Repo {
    pub name: String,
    pub full_name: String,
    pub owner: Account,
}

#[derive(Deserialize, Debug)]
pub struct Account {
    pub login: String,
}

impl From<Repo> for crate::GithubRepo {
    fn from(repo: Repo) -> Self {
        crate::GithubRepo {
            name: repo.name,
            owner: repo.owner.login,
            full_name: repo.full_name,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CommitItem {
    pub sha: String,
    pub commit: CommitDetail,
}

#[derive(Deserialize, Debug)]
pub struct CommitDetail {
    pub author: Option<GitSignature>,
    pub committer: Option<GitSignature>,
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
    pub date: DateTime<Utc>,
}

impl From<GitSignature> for api::Signature {
    fn from(signature: GitSignature) -> Self {
        api::Signature::new(signature.name, signature.email, signature.date)
    }
}

impl From<CommitItem> for api::Commit {
    fn from(item: CommitItem) -> Self {
        api::Commit {
            sha: item.sha,
            author: item.commit.author.map(api::Signature::from),
            committer: item.commit.committer.map(api::Signature::from),
            message: item.commit.message,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct IssueItem {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub user: Option<Account>,
    pub state: IssueState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub comments: u32,
    pub pull_request: Option<IgnoredAny>,
}

impl From<IssueItem> for api::Issue {
    fn from(item: IssueItem) -> Self {
        api::Issue {
            id: item.id,
            number: item.number,
            title: item.title,
            user: item.user.map(|user| user.login),
            state: item.state,
            created_at: item.created_at,
            closed_at: item.closed_at,
            comments: item.comments,
            pull_request: item.pull_request.is_some(),
        }
    }
}
