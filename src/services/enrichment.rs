//! Enrichment Worker Pool
//!
//! Augments a page of base records with profile and activity statistics.
//! Fan-out is a bounded batch of in-flight futures joined in input order, so
//! every input record yields exactly one output record in its original page
//! position. A failed lookup degrades that single record, never the batch.

use std::sync::Arc;

use futures::future::join_all;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::github::types::RateLimitSnapshot;
use crate::github::ContributorSource;
use crate::models::{Contributor, RepoRef, RECENT_ACTIVITY_LIMIT};
use crate::services::aggregator::scale_sampled_lines;
use crate::services::governor::QuotaGovernor;

/// Size of the activity sample inspected per contributor
pub const ACTIVITY_SAMPLE_LIMIT: u32 = 10;

/// Bounded-concurrency enrichment stage
pub struct EnrichmentPool {
    source: Arc<dyn ContributorSource>,
}

impl EnrichmentPool {
    pub fn new(source: Arc<dyn ContributorSource>) -> Self {
        Self { source }
    }

    /// Enrich a page of base records. Batch width follows the governor's
    /// quota-derived size and is recomputed between batches; quota signals
    /// observed during enrichment are fed back into the governor.
    pub async fn enrich_page(
        &self,
        repo: &RepoRef,
        mut records: Vec<Contributor>,
        governor: &mut QuotaGovernor,
    ) -> Vec<Contributor> {
        let mut enriched = Vec::with_capacity(records.len());

        while !records.is_empty() {
            let width = governor.batch_size().min(records.len());
            let batch: Vec<Contributor> = records.drain(..width).collect();
            debug!(width, remaining = governor.remaining(), "enriching batch");

            let results = join_all(
                batch
                    .into_iter()
                    .map(|record| self.enrich_one(repo, record)),
            )
            .await;

            for (record, rates) in results {
                for rate in rates {
                    governor.record(rate);
                }
                enriched.push(record);
            }

            if !records.is_empty() {
                if let Some(delay) = governor.batch_delay() {
                    sleep(delay).await;
                }
            }
        }

        enriched
    }

    /// Enrich a single record, degrading to whatever was gathered so far on
    /// any failure. Returns the record together with the rate signals seen.
    async fn enrich_one(
        &self,
        repo: &RepoRef,
        mut record: Contributor,
    ) -> (Contributor, Vec<RateLimitSnapshot>) {
        let mut rates = Vec::new();

        let profile = match self.source.profile(&record.identity).await {
            Ok(fetched) => {
                rates.extend(fetched.rate);
                fetched.data
            }
            Err(e) => {
                warn!(identity = %record.identity, error = %e, "profile fetch failed, keeping base record");
                return (record, rates);
            }
        };
        record.profile = Some(profile);

        let commits = match self
            .source
            .recent_commits(repo, &record.identity, ACTIVITY_SAMPLE_LIMIT)
            .await
        {
            Ok(fetched) => {
                rates.extend(fetched.rate);
                fetched.data
            }
            Err(e) => {
                warn!(identity = %record.identity, error = %e, "activity fetch failed, keeping profile only");
                return (record, rates);
            }
        };

        if commits.is_empty() {
            return (record, rates);
        }

        let timestamps: Vec<_> = commits.iter().filter_map(|c| c.authored_at).collect();
        record.first_activity_at = timestamps.iter().min().copied();
        record.last_activity_at = timestamps.iter().max().copied();

        let sample_size = commits.len();
        let mut added = 0u64;
        let mut removed = 0u64;
        for commit in &commits {
            match self.source.commit_stats(repo, &commit.sha).await {
                Ok(fetched) => {
                    rates.extend(fetched.rate);
                    added += fetched.data.additions;
                    removed += fetched.data.deletions;
                }
                Err(e) => {
                    warn!(sha = %commit.sha, error = %e, "commit detail fetch failed, skipping");
                }
            }
        }

        record.lines_added = scale_sampled_lines(added, sample_size, record.contribution_count);
        record.lines_removed = scale_sampled_lines(removed, sample_size, record.contribution_count);
        record.recent_activity = commits.into_iter().take(RECENT_ACTIVITY_LIMIT).collect();

        (record, rates)
    }
}
