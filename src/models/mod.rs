pub mod contributor;
pub mod query;
pub mod response;

pub use contributor::{
    CommitSummary, Contributor, ContributorKind, ContributorProfile, RepoRef, RepositoryInfo,
    RECENT_ACTIVITY_LIMIT,
};
pub use query::{
    ContributorsQuery, FetchOptions, FilterCriteria, SortDirection, SortKey, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
pub use response::{ApiResponse, FetchMeta, Pagination};
