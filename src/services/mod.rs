pub mod aggregator;
pub mod enrichment;
pub mod filter;
pub mod governor;
pub mod retry;
pub mod roster;

pub use aggregator::{scale_sampled_lines, RosterAggregator};
pub use enrichment::{EnrichmentPool, ACTIVITY_SAMPLE_LIMIT};
pub use filter::RosterWindow;
pub use governor::{GovernorAction, QuotaGovernor};
pub use retry::{RecoveryAction, RetryController};
pub use roster::{FetchError, RosterOutcome, RosterService, EMPTY_PAGE_LIMIT, UPSTREAM_PAGE_SIZE};
