//! Contributor record and related types
//!
//! One record per contributor identity, created from the raw paginated
//! listing and optionally augmented with profile and activity statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the recent activity items kept per contributor
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Whether a contributor is a person or an automated account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributorKind {
    #[default]
    Person,
    Automated,
}

impl ContributorKind {
    /// Map the upstream account type string; anything other than a bot
    /// account counts as a person
    pub fn from_upstream(kind: &str) -> Self {
        if kind.eq_ignore_ascii_case("bot") {
            Self::Automated
        } else {
            Self::Person
        }
    }
}

impl fmt::Display for ContributorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person => write!(f, "person"),
            Self::Automated => write!(f, "automated"),
        }
    }
}

/// Profile detail attached to a contributor when enrichment succeeded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributorProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub organization: Option<String>,
    pub website: Option<String>,
    pub social_handle: Option<String>,
    pub public_items: u32,
    pub followers: u32,
    pub following: u32,
    pub joined_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One recent activity item (a commit) attributed to a contributor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    pub sha: String,
    pub message: String,
    pub author_name: Option<String>,
    pub authored_at: Option<DateTime<Utc>>,
}

/// One row of the aggregated roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    /// Unique key (upstream login); immutable once assigned
    pub identity: String,
    pub numeric_id: u64,
    pub avatar_url: String,
    pub profile_url: String,
    /// Authoritative count from the base listing; enrichment never
    /// overwrites it
    pub contribution_count: u64,
    pub kind: ContributorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ContributorProfile>,
    pub activity_count: u64,
    pub lines_added: u64,
    pub lines_removed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_activity_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity_at: Option<DateTime<Utc>>,
    /// At most [`RECENT_ACTIVITY_LIMIT`] items, most recent first
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub recent_activity: Vec<CommitSummary>,
}

impl Contributor {
    /// Build a base record from listing fields; enrichment fields start at
    /// their defaults with `activity_count` mirroring the listing count
    pub fn base(
        identity: String,
        numeric_id: u64,
        avatar_url: String,
        profile_url: String,
        contribution_count: u64,
        kind: ContributorKind,
    ) -> Self {
        Self {
            identity,
            numeric_id,
            avatar_url,
            profile_url,
            contribution_count,
            kind,
            profile: None,
            activity_count: contribution_count,
            lines_added: 0,
            lines_removed: 0,
            first_activity_at: None,
            last_activity_at: None,
            recent_activity: Vec::new(),
        }
    }

    /// Name used for lexicographic ordering: profile display name when
    /// present, identity otherwise
    pub fn sort_name(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.display_name.as_deref())
            .unwrap_or(&self.identity)
    }
}

/// Reference to an upstream repository by owner and name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for RepoRef {
    type Err = String;

    /// Accepts https URLs, ssh remotes, bare `github.com/...` paths and plain
    /// `owner/repo`, with or without a trailing `.git`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Repository URL is empty".to_string());
        }

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        let rest = rest.strip_prefix("git@github.com:").unwrap_or(rest);
        let rest = rest.strip_prefix("github.com/").unwrap_or(rest);

        let mut parts = rest.split('/').filter(|p| !p.is_empty());
        let owner = parts.next().ok_or_else(|| invalid(trimmed))?;
        let name = parts.next().ok_or_else(|| invalid(trimmed))?;
        let name = name.strip_suffix(".git").unwrap_or(name);

        let valid =
            |p: &str| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric() || "._-".contains(c));
        if !valid(owner) || !valid(name) {
            return Err(invalid(trimmed));
        }

        Ok(Self::new(owner, name))
    }
}

fn invalid(input: &str) -> String {
    format!("Invalid repository URL: {input}")
}

/// Normalized repository metadata from the upstream lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub profile_url: String,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub open_issues: u64,
    pub default_branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}
