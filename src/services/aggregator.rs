//! Aggregator/Estimator
//!
//! Owns the in-memory roster for one fetch session: identity-keyed merge with
//! accumulation order preserved, plus the pure line-count estimation used by
//! the enrichment stage.

use std::collections::HashMap;

use tracing::debug;

use crate::models::Contributor;

/// Identity-keyed collection preserving first-seen order
#[derive(Debug, Default)]
pub struct RosterAggregator {
    records: Vec<Contributor>,
    index: HashMap<String, usize>,
    observed: usize,
}

impl RosterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one record; a repeated identity updates the existing slot
    /// field-by-field instead of adding a row
    pub fn insert(&mut self, incoming: Contributor) {
        self.observed += 1;
        match self.index.get(&incoming.identity) {
            Some(&slot) => merge_record(&mut self.records[slot], incoming),
            None => {
                self.index.insert(incoming.identity.clone(), self.records.len());
                self.records.push(incoming);
            }
        }
    }

    pub fn extend(&mut self, incoming: impl IntoIterator<Item = Contributor>) {
        for record in incoming {
            self.insert(record);
        }
    }

    /// Unique identities aggregated so far
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total records observed, duplicates included; diagnostics only
    pub fn observed(&self) -> usize {
        self.observed
    }

    /// Consume the aggregator, yielding records in accumulation order
    pub fn into_records(self) -> Vec<Contributor> {
        debug!(
            unique = self.records.len(),
            observed = self.observed,
            "roster aggregation finished"
        );
        self.records
    }
}

/// Last-write-wins per field, but only when the incoming value is non-empty:
/// a present value is never replaced by an empty one
fn merge_record(existing: &mut Contributor, incoming: Contributor) {
    // identity is the key and stays as assigned
    if incoming.numeric_id != 0 {
        existing.numeric_id = incoming.numeric_id;
    }
    if !incoming.avatar_url.is_empty() {
        existing.avatar_url = incoming.avatar_url;
    }
    if !incoming.profile_url.is_empty() {
        existing.profile_url = incoming.profile_url;
    }
    if incoming.contribution_count != 0 {
        existing.contribution_count = incoming.contribution_count;
    }
    existing.kind = incoming.kind;
    if incoming.profile.is_some() {
        existing.profile = incoming.profile;
    }
    if incoming.activity_count != 0 {
        existing.activity_count = incoming.activity_count;
    }
    if incoming.lines_added != 0 {
        existing.lines_added = incoming.lines_added;
    }
    if incoming.lines_removed != 0 {
        existing.lines_removed = incoming.lines_removed;
    }
    if incoming.first_activity_at.is_some() {
        existing.first_activity_at = incoming.first_activity_at;
    }
    if incoming.last_activity_at.is_some() {
        existing.last_activity_at = incoming.last_activity_at;
    }
    if !incoming.recent_activity.is_empty() {
        existing.recent_activity = incoming.recent_activity;
    }
}

/// Extrapolate total line counts from a sampled subset of activity.
///
/// When only `sample_size` of `contribution_count` activity items were
/// inspected, the sampled sum is scaled by their ratio and rounded to the
/// nearest integer. The result is deliberately approximate but directionally
/// correct; a sample covering the full history is returned unscaled.
pub fn scale_sampled_lines(sampled: u64, sample_size: usize, contribution_count: u64) -> u64 {
    if sample_size as u64 >= contribution_count {
        return sampled;
    }
    let ratio = contribution_count as f64 / sample_size.max(1) as f64;
    (sampled as f64 * ratio).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::contributor;
    use crate::models::ContributorProfile;

    #[test]
    fn test_unique_identities_yield_one_record_each() {
        let mut aggregator = RosterAggregator::new();
        for page in 0..3 {
            for i in 0..10 {
                aggregator.insert(contributor(&format!("user-{page}-{i}"), 1));
            }
        }
        assert_eq!(aggregator.len(), 30);
        assert_eq!(aggregator.observed(), 30);
    }

    #[test]
    fn test_repeated_identity_is_merged_not_duplicated() {
        let mut aggregator = RosterAggregator::new();
        aggregator.insert(contributor("octocat", 10));
        aggregator.insert(contributor("octocat", 12));

        assert_eq!(aggregator.len(), 1);
        assert_eq!(aggregator.observed(), 2);
        let records = aggregator.into_records();
        assert_eq!(records[0].contribution_count, 12);
    }

    #[test]
    fn test_merge_never_replaces_present_with_empty() {
        let mut aggregator = RosterAggregator::new();

        let mut first = contributor("octocat", 10);
        first.profile = Some(ContributorProfile {
            display_name: Some("The Octocat".to_string()),
            ..Default::default()
        });
        first.lines_added = 500;
        aggregator.insert(first);

        let mut second = contributor("octocat", 0);
        second.avatar_url = String::new();
        second.profile_url = String::new();
        second.numeric_id = 0;
        second.activity_count = 0;
        aggregator.insert(second);

        let records = aggregator.into_records();
        let merged = &records[0];
        assert_eq!(merged.contribution_count, 10, "zero count must not win");
        assert!(merged.profile.is_some(), "present profile must not be cleared");
        assert_eq!(merged.lines_added, 500);
        assert!(!merged.avatar_url.is_empty());
    }

    #[test]
    fn test_accumulation_order_preserved() {
        let mut aggregator = RosterAggregator::new();
        aggregator.insert(contributor("zoe", 1));
        aggregator.insert(contributor("adam", 2));
        aggregator.insert(contributor("zoe", 3));

        let order: Vec<_> = aggregator
            .into_records()
            .into_iter()
            .map(|c| c.identity)
            .collect();
        assert_eq!(order, ["zoe", "adam"], "merge keeps the first-seen slot");
    }

    #[test]
    fn test_scaling_matches_contribution_ratio() {
        // 10 sampled items carrying 50 added lines for a 100-contribution
        // identity extrapolate to 500
        assert_eq!(scale_sampled_lines(50, 10, 100), 500);
    }

    #[test]
    fn test_full_sample_is_not_scaled() {
        assert_eq!(scale_sampled_lines(50, 10, 10), 50);
        assert_eq!(scale_sampled_lines(50, 10, 7), 50);
    }

    #[test]
    fn test_scaling_rounds_to_nearest() {
        // 7 * 10 / 3 = 23.33... -> 23
        assert_eq!(scale_sampled_lines(7, 3, 10), 23);
        // 5 * 10 / 3 = 16.66... -> 17
        assert_eq!(scale_sampled_lines(5, 3, 10), 17);
    }

    #[test]
    fn test_scaling_empty_sample() {
        assert_eq!(scale_sampled_lines(0, 0, 100), 0);
    }
}
