//! Scripted `ContributorSource` for tests
//!
//! Mimics the real source without network access: page results are consumed
//! from a queue (so a retried page simply sees the next scripted result) and
//! per-identity lookups come from configurable tables. Every call is
//! recorded for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::github::error::GithubError;
use crate::github::types::{CommitStats, Fetched, RateLimitSnapshot};
use crate::models::{CommitSummary, Contributor, ContributorProfile, RepoRef, RepositoryInfo};

type PageResult = Result<Fetched<Vec<Contributor>>, GithubError>;
type ProfileResult = Result<Fetched<ContributorProfile>, GithubError>;
type CommitsResult = Result<Fetched<Vec<CommitSummary>>, GithubError>;
type StatsResult = Result<Fetched<CommitStats>, GithubError>;
type RepositoryResult = Result<Fetched<RepositoryInfo>, GithubError>;

#[derive(Default)]
struct ScriptState {
    pages: VecDeque<PageResult>,
    profiles: HashMap<String, ProfileResult>,
    commits: HashMap<String, CommitsResult>,
    stats: HashMap<String, StatsResult>,
    repository: Option<RepositoryResult>,
    rate_limit: Option<Result<RateLimitSnapshot, GithubError>>,
    calls: Vec<String>,
}

/// Scripted upstream source
#[derive(Default)]
pub struct ScriptedSource {
    state: Mutex<ScriptState>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue the result of the next contributor page fetch
    pub fn push_page(&self, items: Vec<Contributor>) -> &Self {
        self.lock().pages.push_back(Ok(Fetched::bare(items)));
        self
    }

    /// Queue a page result carrying a rate-limit trailer
    pub fn push_page_with_rate(&self, items: Vec<Contributor>, rate: RateLimitSnapshot) -> &Self {
        self.lock().pages.push_back(Ok(Fetched::new(items, Some(rate))));
        self
    }

    /// Queue a failing page fetch
    pub fn push_page_error(&self, error: GithubError) -> &Self {
        self.lock().pages.push_back(Err(error));
        self
    }

    /// Script the profile lookup for one identity
    pub fn set_profile(&self, identity: &str, result: ProfileResult) -> &Self {
        self.lock().profiles.insert(identity.to_string(), result);
        self
    }

    /// Script the commit listing for one identity
    pub fn set_commits(&self, identity: &str, result: CommitsResult) -> &Self {
        self.lock().commits.insert(identity.to_string(), result);
        self
    }

    /// Script the detail statistics for one commit sha
    pub fn set_stats(&self, sha: &str, result: StatsResult) -> &Self {
        self.lock().stats.insert(sha.to_string(), result);
        self
    }

    pub fn set_repository(&self, result: RepositoryResult) -> &Self {
        self.lock().repository = Some(result);
        self
    }

    pub fn set_rate_limit(&self, result: Result<RateLimitSnapshot, GithubError>) -> &Self {
        self.lock().rate_limit = Some(result);
        self
    }

    /// Number of calls recorded for a method name
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| *c == method).count()
    }

    /// Whether a method was called at least once
    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }
}

#[async_trait]
impl crate::github::ContributorSource for ScriptedSource {
    async fn contributor_page(
        &self,
        _repo: &RepoRef,
        _page: u32,
        _per_page: u32,
    ) -> PageResult {
        let mut state = self.lock();
        state.calls.push("contributor_page".to_string());
        state
            .pages
            .pop_front()
            .unwrap_or_else(|| Ok(Fetched::bare(Vec::new())))
    }

    async fn profile(&self, identity: &str) -> ProfileResult {
        let mut state = self.lock();
        state.calls.push("profile".to_string());
        state
            .profiles
            .get(identity)
            .cloned()
            .unwrap_or_else(|| Ok(Fetched::bare(ContributorProfile::default())))
    }

    async fn recent_commits(
        &self,
        _repo: &RepoRef,
        identity: &str,
        _limit: u32,
    ) -> CommitsResult {
        let mut state = self.lock();
        state.calls.push("recent_commits".to_string());
        state
            .commits
            .get(identity)
            .cloned()
            .unwrap_or_else(|| Ok(Fetched::bare(Vec::new())))
    }

    async fn commit_stats(&self, _repo: &RepoRef, sha: &str) -> StatsResult {
        let mut state = self.lock();
        state.calls.push("commit_stats".to_string());
        state
            .stats
            .get(sha)
            .cloned()
            .unwrap_or_else(|| Ok(Fetched::bare(CommitStats::default())))
    }

    async fn repository(&self, repo: &RepoRef) -> RepositoryResult {
        let mut state = self.lock();
        state.calls.push("repository".to_string());
        state.repository.clone().unwrap_or_else(|| {
            Ok(Fetched::bare(RepositoryInfo {
                name: repo.name.clone(),
                full_name: repo.to_string(),
                description: None,
                profile_url: String::new(),
                stars: 0,
                forks: 0,
                watchers: 0,
                open_issues: 0,
                default_branch: "main".to_string(),
                language: None,
            }))
        })
    }

    async fn rate_limit(&self) -> Result<RateLimitSnapshot, GithubError> {
        let mut state = self.lock();
        state.calls.push("rate_limit".to_string());
        state
            .rate_limit
            .clone()
            .unwrap_or_else(|| Err(GithubError::Transport("rate limit not scripted".to_string())))
    }
}

/// Base contributor with the given identity and contribution count, for tests
pub fn contributor(identity: &str, contributions: u64) -> Contributor {
    Contributor::base(
        identity.to_string(),
        identity.len() as u64,
        format!("https://example.invalid/{identity}.png"),
        format!("https://example.invalid/{identity}"),
        contributions,
        crate::models::ContributorKind::Person,
    )
}
