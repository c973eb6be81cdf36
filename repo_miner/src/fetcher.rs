use crate::api::{Client, Repo, RepoId, StateFilter};
use crate::{CommitRecord, Error, IssueRecord, Result};
use chrono::Utc;
use derive_more::Constructor;
use futures::future;
use futures::stream::{self, BoxStream};
use futures::{Future, StreamExt, TryStreamExt};
use log::{debug, info};

/// Fetches repository history through an explicitly provided API `Client`.
pub struct RepoMiner<CLIENT>
where
    CLIENT: Client,
{
    client: CLIENT,
}

impl<CLIENT> RepoMiner<CLIENT>
where
    CLIENT: Client,
{
    pub fn new(client: CLIENT) -> Self {
        RepoMiner { client }
    }

    /// Returns up to `cap` commits in the order the API lists them, all of them without a `cap`.
    pub async fn commits(&self, repo: &RepoId, cap: Option<usize>) -> Result<Vec<CommitRecord>> {
        let repo = self.client.repository(repo).await?;
        let client = &self.client;
        let repo = &repo;
        let commits = listing(Self::paginator(cap), move |page| {
            client.commits(repo, page.page_no, page.page_size)
        })
        .take(cap.unwrap_or(usize::MAX))
        .and_then(|commit| future::ready(CommitRecord::try_from(commit)))
        .try_collect::<Vec<_>>()
        .await?;
        info!("Fetched {} commits of {}", commits.len(), repo.full_name());
        Ok(commits)
    }

    /// Returns up to `cap` issues in `state`. Pull requests are skipped and do not count toward `cap`.
    pub async fn issues(&self, repo: &RepoId, state: StateFilter, cap: Option<usize>) -> Result<Vec<IssueRecord>> {
        let repo = self.client.repository(repo).await?;
        let client = &self.client;
        let repo = &repo;
        let now = Utc::now();
        let issues = listing(Self::paginator(cap), move |page| {
            client.issues(repo, state, page.page_no, page.page_size)
        })
        .try_filter(|issue| {
            if issue.pull_request {
                debug!("Skipping pull request #{}", issue.number);
            }
            future::ready(!issue.pull_request)
        })
        .take(cap.unwrap_or(usize::MAX))
        .map_ok(|issue| IssueRecord::from_issue(issue, now))
        .try_collect::<Vec<_>>()
        .await?;
        info!("Fetched {} {} issues of {}", issues.len(), state, repo.full_name());
        Ok(issues)
    }

    fn paginator(cap: Option<usize>) -> Paginator {
        let page_size = match cap {
            Some(cap) => cap.clamp(1, CLIENT::MAX_PAGE_SIZE as usize) as u32,
            None => CLIENT::MAX_PAGE_SIZE,
        };
        Paginator::new(CLIENT::FIRST_PAGE_NUMBER, page_size, false)
    }
}

/// Lazily flattens consecutive pages into a stream of items.
///
/// A page is requested only once every item of the previous one has been consumed,
/// and the listing ends with the first page shorter than the page size.
fn listing<'a, T, F, FUT>(paginator: Paginator, fetch_page: F) -> BoxStream<'a, Result<T>>
where
    T: Send + 'a,
    F: Fn(Page) -> FUT + Send + 'a,
    FUT: Future<Output = Result<Vec<T>>> + Send + 'a,
{
    stream::try_unfold((paginator, fetch_page), |(mut paginator, fetch_page)| async move {
        let page = match paginator.next_page() {
            Some(page) => page,
            None => return Ok(None),
        };
        debug!("Requesting page {} of {} items", page.page_no, page.page_size);
        let items = fetch_page(page).await?;
        debug!("Received {} items", items.len());
        paginator.received(items.len());
        Ok::<_, Error>(Some((stream::iter(items.into_iter().map(Ok::<T, Error>)), (paginator, fetch_page))))
    })
    .try_flatten()
    .boxed()
}

#[derive(Debug, PartialEq, Constructor)]
struct Page {
    page_no: u32,
    page_size: u32,
}

#[derive(Debug, Constructor)]
struct Paginator {
    page_no: u32,
    page_size: u32,
    exhausted: bool,
}

impl Paginator {
    fn next_page(&self) -> Option<Page> {
        if self.exhausted {
            None
        } else {
            Some(Page::new(self.page_no, self.page_size))
        }
    }

    fn received(&mut self, items: usize) {
        if items < self.page_size as usize {
            self.exhausted = true;
        } else {
            self.page_no += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Commit, Issue, Signature};
    use crate::IssueState;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone};
    use std::sync::Mutex;

    struct FakeRepo(String);

    impl Repo for FakeRepo {
        fn full_name(&self) -> &str {
            &self.0
        }
    }

    /// In-memory API serving `commits` and `issues` in pages, recording every requested page.
    #[derive(Default)]
    struct FakeClient {
        commits: Vec<Commit>,
        issues: Vec<Issue>,
        requests: Mutex<Vec<(u32, u32)>>,
    }

    impl FakeClient {
        fn page<T: Clone>(&self, items: &[T], page: u32, per_page: u32) -> Vec<T> {
            self.requests.lock().unwrap().push((page, per_page));
            items
                .iter()
                .skip(((page - 1) * per_page) as usize)
                .take(per_page as usize)
                .cloned()
                .collect()
        }

        fn requests(&self) -> Vec<(u32, u32)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Client for FakeClient {
        type Repo = FakeRepo;

        const MAX_PAGE_SIZE: u32 = 4;
        const FIRST_PAGE_NUMBER: u32 = 1;

        async fn repository(&self, repo: &RepoId) -> Result<FakeRepo> {
            Ok(FakeRepo(repo.to_string()))
        }

        async fn commits(&self, _repo: &FakeRepo, page: u32, per_page: u32) -> Result<Vec<Commit>> {
            Ok(self.page(&self.commits, page, per_page))
        }

        async fn issues(&self, _repo: &FakeRepo, _state: StateFilter, page: u32, per_page: u32) -> Result<Vec<Issue>> {
            Ok(self.page(&self.issues, page, per_page))
        }
    }

    fn created() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 10, 1, 12, 0, 0).unwrap()
    }

    fn commit(index: usize) -> Commit {
        Commit {
            sha: format!("sha{}", index),
            author: Some(Signature::new(
                format!("Author{}", index),
                format!("example{}@example.com", index),
                created() - Duration::days(index as i64),
            )),
            committer: None,
            message: format!("Commit {}\n\nBody of commit {}", index, index),
        }
    }

    fn issue(number: u64, pull_request: bool) -> Issue {
        Issue {
            id: number + 100,
            number,
            title: format!("Item {}", number),
            user: Some("alice".to_string()),
            state: IssueState::Closed,
            created_at: created(),
            closed_at: Some(Utc.with_ymd_and_hms(2023, 10, 5, 15, 30, 0).unwrap()),
            comments: 1,
            pull_request,
        }
    }

    fn repo() -> RepoId {
        "octocat/Hello-World".parse().unwrap()
    }

    fn shas(commits: &[CommitRecord]) -> Vec<&str> {
        commits.iter().map(|commit| commit.sha.as_str()).collect()
    }

    #[tokio::test]
    async fn commits_cap_test() {
        let client = FakeClient {
            commits: (0..10).map(commit).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let commits = miner.commits(&repo(), Some(3)).await.unwrap();
        assert_eq!(shas(&commits), vec!["sha0", "sha1", "sha2"]);
        assert!(commits.iter().all(|commit| !commit.message.contains('\n')));
        assert_eq!(commits[0].message, "Commit 0");
        assert_eq!(miner.client.requests(), vec![(1, 3)], "Cap should fit into a single page");
    }

    #[tokio::test]
    async fn commits_cap_over_pages_test() {
        let client = FakeClient {
            commits: (0..10).map(commit).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let commits = miner.commits(&repo(), Some(9)).await.unwrap();
        assert_eq!(commits.len(), 9);
        assert_eq!(commits[8].sha, "sha8");
        assert_eq!(miner.client.requests(), vec![(1, 4), (2, 4), (3, 4)]);
    }

    #[tokio::test]
    async fn commits_cap_above_available_test() {
        let client = FakeClient {
            commits: (0..3).map(commit).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let commits = miner.commits(&repo(), Some(50)).await.unwrap();
        assert_eq!(shas(&commits), vec!["sha0", "sha1", "sha2"]);
    }

    #[tokio::test]
    async fn commits_uncapped_test() {
        let client = FakeClient {
            commits: (0..8).map(commit).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let commits = miner.commits(&repo(), None).await.unwrap();
        assert_eq!(commits.len(), 8);
        assert_eq!(
            miner.client.requests(),
            vec![(1, 4), (2, 4), (3, 4)],
            "Full last page requires one more request to detect the end"
        );
    }

    #[tokio::test]
    async fn commits_zero_cap_test() {
        let client = FakeClient {
            commits: (0..10).map(commit).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let commits = miner.commits(&repo(), Some(0)).await.unwrap();
        assert!(commits.is_empty());
        assert!(miner.client.requests().is_empty(), "Zero cap should not list anything");
    }

    #[tokio::test]
    async fn commits_empty_repo_test() {
        let miner = RepoMiner::new(FakeClient::default());
        let commits = miner.commits(&repo(), None).await.unwrap();
        assert!(commits.is_empty());
        assert_eq!(miner.client.requests(), vec![(1, 4)]);
    }

    #[tokio::test]
    async fn issues_skip_pull_requests_test() {
        let client = FakeClient {
            issues: vec![
                issue(1, true),
                issue(2, false),
                issue(3, true),
                issue(4, true),
                issue(5, false),
                issue(6, false),
                issue(7, false),
            ],
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let issues = miner.issues(&repo(), StateFilter::All, Some(2)).await.unwrap();
        let numbers: Vec<u64> = issues.iter().map(|issue| issue.number).collect();
        assert_eq!(numbers, vec![2, 5], "Pull requests should not count toward the cap");
        assert_eq!(miner.client.requests(), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[tokio::test]
    async fn issues_uncapped_test() {
        let client = FakeClient {
            issues: (1..=6).map(|number| issue(number, number % 3 == 0)).collect(),
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let issues = miner.issues(&repo(), StateFilter::Closed, None).await.unwrap();
        let numbers: Vec<u64> = issues.iter().map(|issue| issue.number).collect();
        assert_eq!(numbers, vec![1, 2, 4, 5]);
        assert!(issues.iter().all(|issue| issue.open_duration_day == 4));
    }

    #[tokio::test]
    async fn issues_open_duration_test() {
        let mut open = issue(1, false);
        open.state = IssueState::Open;
        open.closed_at = None;
        open.created_at = Utc::now() - Duration::days(3) - Duration::hours(1);
        let client = FakeClient {
            issues: vec![open],
            ..Default::default()
        };
        let miner = RepoMiner::new(client);
        let issues = miner.issues(&repo(), StateFilter::Open, None).await.unwrap();
        assert_eq!(issues[0].closed_at, None);
        assert_eq!(issues[0].open_duration_day, 3);
    }

    #[test]
    fn paginator_test() {
        let mut paginator = Paginator::new(1, 2, false);
        assert_eq!(paginator.next_page(), Some(Page::new(1, 2)));
        paginator.received(2);
        assert_eq!(paginator.next_page(), Some(Page::new(2, 2)));
        paginator.received(1);
        assert_eq!(paginator.next_page(), None);
    }
}
