//! GitRoster - contributor roster aggregation service
//!
//! Fetches, enriches and aggregates the full contributor roster of a
//! repository from a rate-limited, paginated upstream API.

// Allow dead code and unused imports for work-in-progress features
#![allow(dead_code)]
#![allow(unused_imports)]

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod github;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::AppError;

pub use models::{
    ApiResponse, CommitSummary, Contributor, ContributorKind, ContributorProfile,
    ContributorsQuery, FetchMeta, FetchOptions, FilterCriteria, Pagination, RepoRef,
    RepositoryInfo, SortDirection, SortKey,
};

pub use github::{ContributorSource, GithubClient, GithubError, RateLimitSnapshot};

pub use services::{
    scale_sampled_lines, EnrichmentPool, FetchError, GovernorAction, QuotaGovernor,
    RecoveryAction, RetryController, RosterAggregator, RosterOutcome, RosterService,
};

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    /// Injected upstream source; `None` when no credential is configured, in
    /// which case the fetching endpoints answer with a configuration error
    pub source: Option<Arc<dyn ContributorSource>>,
}
