//! Typed boundary to the upstream repository/user/commit API
//!
//! All accepted upstream response shapes are normalized into the internal
//! domain types at this edge; components above it only ever see
//! [`Contributor`](crate::models::Contributor)-family types,
//! [`RateLimitSnapshot`](types::RateLimitSnapshot) and [`GithubError`].

pub mod client;
pub mod error;
pub mod testing;
pub mod types;

pub use client::{ContributorSource, GithubClient};
pub use error::GithubError;
pub use types::{CommitStats, Fetched, RateLimitSnapshot, DEFAULT_QUOTA_LIMIT};
