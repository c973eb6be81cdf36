mod builder;
mod payload;

pub use builder::GithubClientBuilder;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use log::debug;
use repo_miner::api::{Client, Commit, Issue, Repo, RepoId, StateFilter};
use repo_miner::Result;
use serde::de::DeserializeOwned;
use url::Url;

pub struct GithubClient {
    client: reqwest::Client,
    github_url: Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GithubRepo {
    name: String,
    owner: String,
    full_name: String,
}

impl Repo for GithubRepo {
    fn full_name(&self) -> &str {
        &self.full_name
    }
}

impl GithubClient {
    /// Appends `segments` to the API base URL, escaping each of them.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.github_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("API URL {} cannot be a base URL", self.github_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<T> {
        debug!("GET {} {:?}", url, query);
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("API rejected request to {}", url))?;
        let body = response
            .json::<T>()
            .await
            .with_context(|| format!("Unexpected response body from {}", url))?;
        Ok(body)
    }
}

#[async_trait]
impl Client for GithubClient {
    type Repo = GithubRepo;

    const MAX_PAGE_SIZE: u32 = 100;
    const FIRST_PAGE_NUMBER: u32 = 1;

    async fn repository(&self, repo: &RepoId) -> Result<Self::Repo> {
        let url = self.endpoint(&["repos", repo.owner(), repo.name()])?;
        let repo = self.get::<payload::Repo>(url, &[]).await?;
        Ok(GithubRepo::from(repo))
    }

    async fn commits(&self, repo: &Self::Repo, page: u32, per_page: u32) -> Result<Vec<Commit>> {
        let url = self.endpoint(&["repos", &repo.owner, &repo.name, "commits"])?;
        let query = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let commits = self.get::<Vec<payload::CommitItem>>(url, &query).await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }

    async fn issues(&self, repo: &Self::Repo, state: StateFilter, page: u32, per_page: u32) -> Result<Vec<Issue>> {
        let url = self.endpoint(&["repos", &repo.owner, &repo.name, "issues"])?;
        let query = [
            ("state", state.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let issues = self.get::<Vec<payload::IssueItem>>(url, &query).await?;
        Ok(issues.into_iter().map(Issue::from).collect())
    }
}
