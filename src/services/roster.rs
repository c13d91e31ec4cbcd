//! Pagination Driver
//!
//! Drives successive page fetches until natural exhaustion or a stopping
//! condition fires, feeding each page through enrichment and into the
//! aggregator, consulting the governor for pacing and the retry controller
//! for failure recovery. One `fetch` call is one session; nothing is shared
//! between sessions.

use std::sync::Arc;

use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::github::{ContributorSource, GithubError};
use crate::models::{Contributor, FetchMeta, FetchOptions, RepoRef};
use crate::services::aggregator::RosterAggregator;
use crate::services::enrichment::EnrichmentPool;
use crate::services::governor::{GovernorAction, QuotaGovernor};
use crate::services::retry::{RecoveryAction, RetryController};

/// Fixed upstream page size (the upstream maximum)
pub const UPSTREAM_PAGE_SIZE: u32 = 100;

/// Consecutive empty pages taken as pagination exhaustion; the upstream does
/// not reliably signal a last page
pub const EMPTY_PAGE_LIMIT: u32 = 3;

/// Session-fatal fetch outcome
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Upstream fetch failed: {0}")]
    Upstream(#[from] GithubError),
}

/// Aggregated session result
#[derive(Debug)]
pub struct RosterOutcome {
    /// Unique contributors in accumulation order, unfiltered
    pub contributors: Vec<Contributor>,
    pub meta: FetchMeta,
}

/// Drives one contributor fetch session against an injected source
pub struct RosterService {
    source: Arc<dyn ContributorSource>,
    page_ceiling: u32,
}

impl RosterService {
    pub fn new(source: Arc<dyn ContributorSource>, page_ceiling: u32) -> Self {
        Self {
            source,
            page_ceiling: page_ceiling.max(1),
        }
    }

    /// Fetch, enrich and aggregate the contributor roster of `repo`
    pub async fn fetch(
        &self,
        repo: &RepoRef,
        options: &FetchOptions,
    ) -> Result<RosterOutcome, FetchError> {
        let session = Uuid::new_v4();
        let mut governor = QuotaGovernor::new();
        let mut retry = RetryController::new(options.force_complete);
        let mut aggregator = RosterAggregator::new();
        let pool = EnrichmentPool::new(Arc::clone(&self.source));

        let mut page: u32 = 1;
        let mut consecutive_empty: u32 = 0;
        let mut pages_fetched: u32 = 0;
        let mut rate_limit_hit = false;
        let mut warning: Option<String> = None;

        info!(
            %session,
            repo = %repo,
            enhanced = options.enhanced,
            fetch_all = options.fetch_all,
            "starting contributor fetch session"
        );

        // Seed the governor before the first trailing signal arrives so the
        // first enrichment batches are sized to the real quota
        if options.enhanced {
            match self.source.rate_limit().await {
                Ok(snapshot) => governor.record(snapshot),
                Err(e) => debug!(%session, error = %e, "rate limit probe failed, assuming full quota"),
            }
        }

        let page_limit = if options.max_pages > 0 {
            options.max_pages.min(self.page_ceiling)
        } else {
            self.page_ceiling
        };

        loop {
            let fetched = match self
                .source
                .contributor_page(repo, page, UPSTREAM_PAGE_SIZE)
                .await
            {
                Ok(fetched) => fetched,
                Err(e) => match retry.decide(e, page == 1) {
                    RecoveryAction::RetryAfter(delay) => {
                        debug!(%session, page, delay_secs = delay.as_secs(), "retrying page fetch");
                        sleep(delay).await;
                        continue;
                    }
                    RecoveryAction::Drain => {
                        rate_limit_hit = true;
                        warning = Some(
                            "Upstream quota exhausted before pagination completed; partial roster returned"
                                .to_string(),
                        );
                        break;
                    }
                    RecoveryAction::NotFound => {
                        return Err(FetchError::RepoNotFound(repo.to_string()));
                    }
                    RecoveryAction::Fatal(e) => return Err(FetchError::Upstream(e)),
                },
            };

            pages_fetched += 1;
            let rate = fetched.rate;
            let records = fetched.data;

            if records.is_empty() {
                consecutive_empty += 1;
                if consecutive_empty >= EMPTY_PAGE_LIMIT {
                    debug!(%session, page, "pagination exhausted after consecutive empty pages");
                    break;
                }
            } else {
                consecutive_empty = 0;
                debug!(%session, page, records = records.len(), "processing page");
                let processed = if options.enhanced {
                    pool.enrich_page(repo, records, &mut governor).await
                } else {
                    records
                };
                aggregator.extend(processed);
            }

            if !options.fetch_all {
                break;
            }

            if pages_fetched >= page_limit {
                if options.max_pages == 0 {
                    warn!(%session, page_limit, "stopping at the page safety ceiling");
                    warning = Some(format!(
                        "Stopped after {page_limit} pages to bound session cost"
                    ));
                }
                break;
            }

            if let Some(snapshot) = rate {
                match governor.observe(snapshot) {
                    GovernorAction::Continue => {}
                    GovernorAction::ContinueAfter(pause) => {
                        info!(%session, pause_secs = pause.as_secs(), "quota pause before next page");
                        sleep(pause).await;
                    }
                    GovernorAction::Abort => break,
                }
            }

            page += 1;
        }

        let meta = FetchMeta {
            total_fetched: aggregator.observed(),
            rate_limit_hit,
            pages_fetched,
            warning,
        };
        let contributors = aggregator.into_records();

        info!(
            %session,
            unique = contributors.len(),
            pages = pages_fetched,
            rate_limit_hit,
            "fetch session complete"
        );

        Ok(RosterOutcome { contributors, meta })
    }
}
