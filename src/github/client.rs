//! Upstream API client
//!
//! `ContributorSource` is the capability handed to the fetch pipeline; the
//! production implementation talks to a GitHub-shaped REST API over reqwest.
//! Sessions receive the source as an explicit dependency so they stay
//! independently testable.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::error::GithubError;
use crate::github::types::{
    CommitStats, Fetched, ListedContributor, RateLimitSnapshot, RawCommit, RawCommitDetail,
    RawRateLimit, RawRepository, RawUser,
};
use crate::models::{CommitSummary, Contributor, ContributorProfile, RepoRef, RepositoryInfo};

/// Capability consumed by the fetch pipeline
#[async_trait]
pub trait ContributorSource: Send + Sync {
    /// One page of the base contributor listing
    async fn contributor_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Fetched<Vec<Contributor>>, GithubError>;

    /// Profile detail for one identity
    async fn profile(&self, identity: &str) -> Result<Fetched<ContributorProfile>, GithubError>;

    /// Most recent commits by an identity within a repository, newest first
    async fn recent_commits(
        &self,
        repo: &RepoRef,
        identity: &str,
        limit: u32,
    ) -> Result<Fetched<Vec<CommitSummary>>, GithubError>;

    /// Line statistics for a single commit
    async fn commit_stats(
        &self,
        repo: &RepoRef,
        sha: &str,
    ) -> Result<Fetched<CommitStats>, GithubError>;

    /// Repository metadata lookup
    async fn repository(&self, repo: &RepoRef) -> Result<Fetched<RepositoryInfo>, GithubError>;

    /// Current quota state
    async fn rate_limit(&self) -> Result<RateLimitSnapshot, GithubError>;
}

/// Production source backed by the upstream REST API
pub struct GithubClient {
    http: Client,
    base_url: String,
}

impl GithubClient {
    /// Build a client with auth, user agent and request timeout applied to
    /// every call
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GithubError::Transport(format!("invalid token header: {e}")))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("gitroster/0.1.0"));

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| GithubError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Issue a GET and decode the body, normalizing status codes and rate
    /// trailers into the internal types
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Fetched<T>, GithubError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| GithubError::Transport(e.to_string()))?;

        let rate = rate_from_headers(&response);
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(error_for_status(status, rate, path, &message));
        }

        debug!(path, status = status.as_u16(), remaining = rate.map(|r| r.remaining), "upstream call");

        let data = response
            .json::<T>()
            .await
            .map_err(|e| GithubError::Decode(format!("{path}: {e}")))?;
        Ok(Fetched::new(data, rate))
    }
}

/// Map a non-success status onto the error taxonomy
fn error_for_status(
    status: StatusCode,
    rate: Option<RateLimitSnapshot>,
    path: &str,
    body: &str,
) -> GithubError {
    let message = if body.is_empty() {
        format!("{path} answered {status}")
    } else {
        format!("{path} answered {status}: {body}")
    };
    match status {
        StatusCode::NOT_FOUND => GithubError::NotFound(message),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => GithubError::RateLimited {
            reset_at: rate.map(|r| r.reset_at),
            message,
        },
        s => GithubError::Upstream {
            status: s.as_u16(),
            message,
        },
    }
}

/// Parse the `x-ratelimit-*` trailers; absent or malformed headers simply
/// yield no snapshot
fn rate_from_headers(response: &Response) -> Option<RateLimitSnapshot> {
    let header = |name: &str| {
        response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<i64>().ok())
    };

    let remaining = header("x-ratelimit-remaining")?;
    let reset = header("x-ratelimit-reset")?;
    let limit = header("x-ratelimit-limit").unwrap_or(i64::from(super::types::DEFAULT_QUOTA_LIMIT));

    Some(RateLimitSnapshot::new(
        remaining.max(0) as u32,
        limit.max(0) as u32,
        Utc.timestamp_opt(reset, 0).single().unwrap_or_else(Utc::now),
    ))
}

#[async_trait]
impl ContributorSource for GithubClient {
    async fn contributor_page(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Fetched<Vec<Contributor>>, GithubError> {
        let fetched: Fetched<Vec<ListedContributor>> = self
            .get_json(
                &format!("/repos/{}/{}/contributors", repo.owner, repo.name),
                &[("page", page.to_string()), ("per_page", per_page.to_string())],
            )
            .await?;
        Ok(Fetched::new(
            fetched.data.into_iter().map(Contributor::from).collect(),
            fetched.rate,
        ))
    }

    async fn profile(&self, identity: &str) -> Result<Fetched<ContributorProfile>, GithubError> {
        let fetched: Fetched<RawUser> = self.get_json(&format!("/users/{identity}"), &[]).await?;
        Ok(Fetched::new(fetched.data.into(), fetched.rate))
    }

    async fn recent_commits(
        &self,
        repo: &RepoRef,
        identity: &str,
        limit: u32,
    ) -> Result<Fetched<Vec<CommitSummary>>, GithubError> {
        let fetched: Fetched<Vec<RawCommit>> = self
            .get_json(
                &format!("/repos/{}/{}/commits", repo.owner, repo.name),
                &[
                    ("author", identity.to_string()),
                    ("per_page", limit.to_string()),
                ],
            )
            .await?;
        Ok(Fetched::new(
            fetched.data.into_iter().map(CommitSummary::from).collect(),
            fetched.rate,
        ))
    }

    async fn commit_stats(
        &self,
        repo: &RepoRef,
        sha: &str,
    ) -> Result<Fetched<CommitStats>, GithubError> {
        let fetched: Fetched<RawCommitDetail> = self
            .get_json(
                &format!("/repos/{}/{}/commits/{sha}", repo.owner, repo.name),
                &[],
            )
            .await?;
        Ok(Fetched::new(fetched.data.into(), fetched.rate))
    }

    async fn repository(&self, repo: &RepoRef) -> Result<Fetched<RepositoryInfo>, GithubError> {
        let fetched: Fetched<RawRepository> = self
            .get_json(&format!("/repos/{}/{}", repo.owner, repo.name), &[])
            .await?;
        Ok(Fetched::new(fetched.data.into(), fetched.rate))
    }

    async fn rate_limit(&self) -> Result<RateLimitSnapshot, GithubError> {
        let fetched: Fetched<RawRateLimit> = self.get_json("/rate_limit", &[]).await?;
        Ok(fetched.data.into())
    }
}
