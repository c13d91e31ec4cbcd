//! Filter, sort and windowing stage
//!
//! Applies the caller's conjunctive predicates and total order over the
//! aggregated roster, then returns either the complete collection or the
//! requested page slice.

use std::cmp::Ordering;

use crate::models::{Contributor, FilterCriteria, SortDirection, SortKey};

/// Filter then sort; the sort is stable, so records with equal keys keep
/// their accumulation order
pub fn apply(mut records: Vec<Contributor>, criteria: &FilterCriteria) -> Vec<Contributor> {
    records.retain(|record| matches(record, criteria));
    sort(&mut records, criteria.sort_key, criteria.sort_direction);
    records
}

/// A record passes only if it satisfies every supplied predicate; substring
/// predicates require the profile field to be present
fn matches(record: &Contributor, criteria: &FilterCriteria) -> bool {
    if let Some(min) = criteria.min_contributions {
        if record.contribution_count < min {
            return false;
        }
    }
    if let Some(max) = criteria.max_contributions {
        if record.contribution_count > max {
            return false;
        }
    }
    if let Some(needle) = &criteria.location {
        let found = record
            .profile
            .as_ref()
            .and_then(|p| p.location.as_ref())
            .is_some_and(|l| contains_ignore_case(l, needle));
        if !found {
            return false;
        }
    }
    if let Some(needle) = &criteria.organization {
        let found = record
            .profile
            .as_ref()
            .and_then(|p| p.organization.as_ref())
            .is_some_and(|o| contains_ignore_case(o, needle));
        if !found {
            return false;
        }
    }
    true
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Stable sort by the given key and direction
pub fn sort(records: &mut [Contributor], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = compare(a, b, key);
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// Pairwise comparator. Note the RecentActivity inconsistency kept from the
/// observed behavior of the system this replaces: a pair with any missing
/// timestamp is ordered by contribution count, so one sorted output can mix
/// the two orders. Flagged for product review rather than silently changed.
fn compare(a: &Contributor, b: &Contributor, key: SortKey) -> Ordering {
    match key {
        SortKey::Contributions => a.contribution_count.cmp(&b.contribution_count),
        SortKey::Name => a
            .sort_name()
            .to_lowercase()
            .cmp(&b.sort_name().to_lowercase()),
        SortKey::RecentActivity => match (a.last_activity_at, b.last_activity_at) {
            (Some(a_ts), Some(b_ts)) => a_ts.cmp(&b_ts),
            _ => a.contribution_count.cmp(&b.contribution_count),
        },
    }
}

/// One page of the filtered roster plus window metadata
#[derive(Debug)]
pub struct RosterWindow {
    pub items: Vec<Contributor>,
    pub page: u32,
    pub per_page: usize,
    pub total_count: usize,
    pub has_next: bool,
}

/// Return everything (`full`) or the `[(page-1)*per_page, page*per_page)`
/// slice; `total_count` is always the filtered size
pub fn window(records: Vec<Contributor>, page: u32, per_page: usize, full: bool) -> RosterWindow {
    let total_count = records.len();

    if full {
        return RosterWindow {
            items: records,
            page,
            per_page,
            total_count,
            has_next: false,
        };
    }

    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);
    let end = start.saturating_add(per_page).min(total_count);
    let items = if start < total_count {
        records[start..end].to_vec()
    } else {
        Vec::new()
    };

    RosterWindow {
        items,
        page,
        per_page,
        total_count,
        has_next: end < total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::testing::contributor;
    use crate::models::ContributorProfile;
    use chrono::{Duration, Utc};

    fn with_profile(identity: &str, contributions: u64, location: &str, org: &str) -> Contributor {
        let mut record = contributor(identity, contributions);
        record.profile = Some(ContributorProfile {
            location: (!location.is_empty()).then(|| location.to_string()),
            organization: (!org.is_empty()).then(|| org.to_string()),
            ..Default::default()
        });
        record
    }

    #[test]
    fn test_contribution_bounds_inclusive() {
        let records = vec![
            contributor("a", 4),
            contributor("b", 5),
            contributor("c", 10),
            contributor("d", 11),
        ];
        let criteria = FilterCriteria {
            min_contributions: Some(5),
            max_contributions: Some(10),
            ..Default::default()
        };

        let filtered = apply(records, &criteria);
        let ids: Vec<_> = filtered.iter().map(|c| c.identity.as_str()).collect();
        assert_eq!(ids, ["c", "b"], "bounds are inclusive, sorted desc by default");
        for record in &filtered {
            assert!(record.contribution_count >= 5 && record.contribution_count <= 10);
        }
    }

    #[test]
    fn test_substring_filters_case_insensitive() {
        let records = vec![
            with_profile("a", 1, "Berlin, Germany", "ACME Corp"),
            with_profile("b", 1, "berlin", "other"),
            with_profile("c", 1, "Paris", "acme"),
        ];
        let criteria = FilterCriteria {
            location: Some("BERLIN".to_string()),
            ..Default::default()
        };
        let filtered = apply(records.clone(), &criteria);
        assert_eq!(filtered.len(), 2);

        let criteria = FilterCriteria {
            organization: Some("Acme".to_string()),
            ..Default::default()
        };
        let filtered = apply(records, &criteria);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_missing_profile_field_fails_predicate() {
        let records = vec![
            contributor("no-profile", 1),
            with_profile("no-location", 1, "", "ACME"),
            with_profile("match", 1, "Berlin", ""),
        ];
        let criteria = FilterCriteria {
            location: Some("berlin".to_string()),
            ..Default::default()
        };
        let filtered = apply(records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].identity, "match");
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let records = vec![
            with_profile("a", 50, "Berlin", "ACME"),
            with_profile("b", 50, "Berlin", "Other"),
            with_profile("c", 2, "Berlin", "ACME"),
        ];
        let criteria = FilterCriteria {
            min_contributions: Some(10),
            location: Some("berlin".to_string()),
            organization: Some("acme".to_string()),
            ..Default::default()
        };
        let filtered = apply(records, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].identity, "a");
    }

    #[test]
    fn test_sort_by_contributions_desc_default() {
        let records = vec![contributor("a", 3), contributor("b", 9), contributor("c", 5)];
        let sorted = apply(records, &FilterCriteria::default());
        let ids: Vec<_> = sorted.iter().map(|c| c.identity.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_sort_by_name_falls_back_to_identity() {
        let mut named = contributor("zzz", 1);
        named.profile = Some(ContributorProfile {
            display_name: Some("Alice".to_string()),
            ..Default::default()
        });
        let records = vec![contributor("bob", 1), named];

        let criteria = FilterCriteria {
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Asc,
            ..Default::default()
        };
        let sorted = apply(records, &criteria);
        assert_eq!(sorted[0].sort_name(), "Alice");
        assert_eq!(sorted[1].sort_name(), "bob");
    }

    #[test]
    fn test_recent_activity_sort_and_fallback() {
        let now = Utc::now();
        let mut a = contributor("a", 100);
        a.last_activity_at = Some(now - Duration::days(10));
        let mut b = contributor("b", 1);
        b.last_activity_at = Some(now);
        let c = contributor("c", 50); // no timestamp: pairs with c order by contributions

        let criteria = FilterCriteria {
            sort_key: SortKey::RecentActivity,
            sort_direction: SortDirection::Desc,
            ..Default::default()
        };
        let sorted = apply(vec![a, b, c], &criteria);
        let ids: Vec<_> = sorted.iter().map(|c| c.identity.as_str()).collect();
        // b beats a on timestamp; c's pairs fall back to contribution count
        assert_eq!(ids[0], "b");
        assert!(ids.contains(&"a") && ids.contains(&"c"));
    }

    #[test]
    fn test_sort_is_stable_and_deterministic() {
        let records: Vec<_> = (0..8)
            .map(|i| contributor(&format!("user-{i}"), 7))
            .collect();

        let first = apply(records.clone(), &FilterCriteria::default());
        let second = apply(records.clone(), &FilterCriteria::default());

        let order = |v: &[Contributor]| v.iter().map(|c| c.identity.clone()).collect::<Vec<_>>();
        assert_eq!(order(&first), order(&second), "same input, same order");
        assert_eq!(
            order(&first),
            order(&records),
            "equal keys keep accumulation order"
        );
    }

    #[test]
    fn test_window_slices_and_flags_next() {
        let records: Vec<_> = (1..=37).map(|i| contributor(&format!("u{i:02}"), i)).collect();

        let page2 = window(records.clone(), 2, 12, false);
        assert_eq!(page2.total_count, 37);
        assert_eq!(page2.items.len(), 12);
        assert_eq!(page2.items.first().unwrap().identity, "u13");
        assert_eq!(page2.items.last().unwrap().identity, "u24");
        assert!(page2.has_next);

        let page4 = window(records.clone(), 4, 12, false);
        assert_eq!(page4.items.len(), 1);
        assert_eq!(page4.items[0].identity, "u37");
        assert!(!page4.has_next);

        let beyond = window(records, 5, 12, false);
        assert!(beyond.items.is_empty());
        assert!(!beyond.has_next);
    }

    #[test]
    fn test_window_full_returns_everything() {
        let records: Vec<_> = (0..7).map(|i| contributor(&format!("u{i}"), i)).collect();
        let full = window(records, 1, 3, true);
        assert_eq!(full.items.len(), 7);
        assert_eq!(full.total_count, 7);
        assert!(!full.has_next);
    }
}
