//! Wire payloads of the upstream API and their normalization
//!
//! This is the single typed decoding boundary: every accepted upstream shape
//! is converted into the internal domain types here, and nothing past this
//! module sees raw payloads or headers.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::models::{
    CommitSummary, Contributor, ContributorKind, ContributorProfile, RepositoryInfo,
};

/// Assumed quota when the upstream has not reported one yet
pub const DEFAULT_QUOTA_LIMIT: u32 = 5000;

/// Remaining-quota and reset-time signal carried by every upstream response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSnapshot {
    pub remaining: u32,
    pub limit: u32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitSnapshot {
    pub fn new(remaining: u32, limit: u32, reset_at: DateTime<Utc>) -> Self {
        Self {
            remaining,
            limit,
            reset_at,
        }
    }

    /// Derived used-call count
    pub fn used(&self) -> u32 {
        self.limit.saturating_sub(self.remaining)
    }
}

/// A decoded response together with its trailing rate-limit signal
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    pub rate: Option<RateLimitSnapshot>,
}

impl<T> Fetched<T> {
    pub fn new(data: T, rate: Option<RateLimitSnapshot>) -> Self {
        Self { data, rate }
    }

    /// A payload with no rate signal attached
    pub fn bare(data: T) -> Self {
        Self { data, rate: None }
    }
}

/// Normalized per-commit line statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitStats {
    pub additions: u64,
    pub deletions: u64,
}

/// One entry of the paginated contributor listing; every field is optional
/// upstream, defaults applied during normalization
#[derive(Debug, Deserialize)]
pub struct ListedContributor {
    pub login: Option<String>,
    pub id: Option<u64>,
    pub avatar_url: Option<String>,
    pub html_url: Option<String>,
    pub contributions: Option<u64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl From<ListedContributor> for Contributor {
    fn from(raw: ListedContributor) -> Self {
        Contributor::base(
            raw.login.unwrap_or_else(|| "unknown".to_string()),
            raw.id.unwrap_or(0),
            raw.avatar_url.unwrap_or_default(),
            raw.html_url.unwrap_or_default(),
            raw.contributions.unwrap_or(0),
            ContributorKind::from_upstream(raw.kind.as_deref().unwrap_or("User")),
        )
    }
}

/// Profile-lookup payload
#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    pub blog: Option<String>,
    pub twitter_username: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<RawUser> for ContributorProfile {
    fn from(raw: RawUser) -> Self {
        ContributorProfile {
            display_name: raw.name,
            email: raw.email,
            bio: raw.bio,
            location: raw.location,
            organization: raw.company,
            website: raw.blog.filter(|b| !b.is_empty()),
            social_handle: raw.twitter_username,
            public_items: raw.public_repos,
            followers: raw.followers,
            following: raw.following,
            joined_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawGitActor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RawCommitBody {
    pub author: Option<RawGitActor>,
    pub committer: Option<RawGitActor>,
    #[serde(default)]
    pub message: String,
}

/// One entry of the commit listing
#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub sha: String,
    pub commit: RawCommitBody,
}

impl From<RawCommit> for CommitSummary {
    fn from(raw: RawCommit) -> Self {
        let authored_at = raw
            .commit
            .author
            .as_ref()
            .and_then(|a| a.date)
            .or_else(|| raw.commit.committer.as_ref().and_then(|c| c.date));
        CommitSummary {
            sha: raw.sha,
            message: raw.commit.message,
            author_name: raw.commit.author.and_then(|a| a.name),
            authored_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawStats {
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

/// Commit-detail payload; only the statistics are consumed
#[derive(Debug, Deserialize)]
pub struct RawCommitDetail {
    pub stats: Option<RawStats>,
}

impl From<RawCommitDetail> for CommitStats {
    fn from(raw: RawCommitDetail) -> Self {
        let stats = raw.stats.unwrap_or_default();
        CommitStats {
            additions: stats.additions,
            deletions: stats.deletions,
        }
    }
}

/// Repository-lookup payload
#[derive(Debug, Deserialize)]
pub struct RawRepository {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub html_url: String,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub watchers_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    pub language: Option<String>,
}

fn default_branch() -> String {
    "main".to_string()
}

impl From<RawRepository> for RepositoryInfo {
    fn from(raw: RawRepository) -> Self {
        RepositoryInfo {
            name: raw.name,
            full_name: raw.full_name,
            description: raw.description,
            profile_url: raw.html_url,
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            watchers: raw.watchers_count,
            open_issues: raw.open_issues_count,
            default_branch: raw.default_branch,
            language: raw.language,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawRateSlice {
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub remaining: u32,
    /// Epoch seconds
    #[serde(default)]
    pub reset: i64,
}

/// Rate-limit probe payload
#[derive(Debug, Deserialize)]
pub struct RawRateLimit {
    pub rate: RawRateSlice,
}

impl From<RawRateLimit> for RateLimitSnapshot {
    fn from(raw: RawRateLimit) -> Self {
        RateLimitSnapshot {
            remaining: raw.rate.remaining,
            limit: raw.rate.limit,
            reset_at: Utc
                .timestamp_opt(raw.rate.reset, 0)
                .single()
                .unwrap_or_else(Utc::now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_normalization_applies_defaults() {
        let raw: ListedContributor = serde_json::from_value(serde_json::json!({
            "login": null,
            "contributions": null
        }))
        .unwrap();
        let contributor = Contributor::from(raw);

        assert_eq!(contributor.identity, "unknown");
        assert_eq!(contributor.numeric_id, 0);
        assert_eq!(contributor.contribution_count, 0);
        assert_eq!(contributor.kind, ContributorKind::Person);
    }

    #[test]
    fn test_listing_normalization_maps_bot_kind() {
        let raw: ListedContributor = serde_json::from_value(serde_json::json!({
            "login": "release-bot",
            "id": 9,
            "avatar_url": "https://example.invalid/bot.png",
            "html_url": "https://example.invalid/release-bot",
            "contributions": 120,
            "type": "Bot"
        }))
        .unwrap();
        let contributor = Contributor::from(raw);

        assert_eq!(contributor.kind, ContributorKind::Automated);
        assert_eq!(contributor.contribution_count, 120);
        assert_eq!(contributor.activity_count, 120);
    }

    #[test]
    fn test_commit_summary_falls_back_to_committer_date() {
        let raw: RawCommit = serde_json::from_value(serde_json::json!({
            "sha": "abc123",
            "commit": {
                "author": { "name": "A", "email": "a@example.invalid", "date": null },
                "committer": { "name": "C", "email": "c@example.invalid", "date": "2024-03-01T12:00:00Z" },
                "message": "fix"
            }
        }))
        .unwrap();
        let summary = CommitSummary::from(raw);

        assert_eq!(summary.sha, "abc123");
        assert!(summary.authored_at.is_some());
        assert_eq!(summary.author_name.as_deref(), Some("A"));
    }

    #[test]
    fn test_commit_detail_without_stats_is_zero() {
        let raw: RawCommitDetail = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(CommitStats::from(raw), CommitStats::default());
    }

    #[test]
    fn test_rate_snapshot_used_is_derived() {
        let snapshot = RateLimitSnapshot::new(4_200, 5_000, Utc::now());
        assert_eq!(snapshot.used(), 800);
    }
}
