//! Rate Limit Governor
//!
//! Tracks the remaining-quota and reset-time signals trailing every upstream
//! response and decides how the session should pace itself: whether to keep
//! going, how long to sleep before the next page, how wide the enrichment
//! batches may be and how long to pause between them.

use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use crate::github::types::{RateLimitSnapshot, DEFAULT_QUOTA_LIMIT};

/// Remaining calls below which the session sleeps until reset (bounded)
const CRITICAL_REMAINING: u32 = 5;

/// Remaining calls below which a soft warning is emitted
const LOW_REMAINING: u32 = 10;

/// Upper bound on a single governor-imposed pause
const MAX_PAUSE: Duration = Duration::from_secs(60);

/// Bounds on the enrichment batch width
const MIN_BATCH: usize = 2;
const MAX_BATCH: usize = 5;

/// Remaining calls that buy one slot of batch width
const BATCH_QUOTA_DIVISOR: u32 = 10;

/// Pacing decision for the next upstream request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GovernorAction {
    /// Proceed immediately
    Continue,
    /// Proceed after the given pause
    ContinueAfter(Duration),
    /// Stop the session; never produced by `observe` on its own — ending a
    /// session over quota is decided jointly with `force_complete` by the
    /// retry controller
    Abort,
}

/// Quota policy for one fetch session
#[derive(Debug, Default)]
pub struct QuotaGovernor {
    last: Option<RateLimitSnapshot>,
    low_quota_warned: bool,
}

impl QuotaGovernor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a trailing signal without making a pacing decision; used by the
    /// enrichment pool which observes many signals per page
    pub fn record(&mut self, snapshot: RateLimitSnapshot) {
        self.last = Some(snapshot);
    }

    /// Track a trailing signal and decide how to pace the next request
    pub fn observe(&mut self, snapshot: RateLimitSnapshot) -> GovernorAction {
        self.record(snapshot);
        let now = Utc::now();

        if snapshot.remaining < CRITICAL_REMAINING && snapshot.reset_at > now {
            let until_reset = (snapshot.reset_at - now).to_std().unwrap_or_default();
            let pause = until_reset.min(MAX_PAUSE);
            warn!(
                remaining = snapshot.remaining,
                pause_secs = pause.as_secs(),
                "upstream quota critically low, pausing before next request"
            );
            return GovernorAction::ContinueAfter(pause);
        }

        if snapshot.remaining < LOW_REMAINING {
            if !self.low_quota_warned {
                warn!(
                    remaining = snapshot.remaining,
                    used = snapshot.used(),
                    "upstream quota running low"
                );
                self.low_quota_warned = true;
            }
        } else {
            self.low_quota_warned = false;
        }

        GovernorAction::Continue
    }

    /// Last observed remaining quota; optimistic before any signal arrived
    pub fn remaining(&self) -> u32 {
        self.last.map(|s| s.remaining).unwrap_or(DEFAULT_QUOTA_LIMIT)
    }

    /// Enrichment batch width: one slot per [`BATCH_QUOTA_DIVISOR`] remaining
    /// calls, clamped to `[2, 5]` so batches shrink as quota drains
    pub fn batch_size(&self) -> usize {
        ((self.remaining() / BATCH_QUOTA_DIVISOR) as usize).clamp(MIN_BATCH, MAX_BATCH)
    }

    /// Pause between enrichment batches, inversely proportional to the
    /// remaining quota
    pub fn batch_delay(&self) -> Option<Duration> {
        match self.remaining() {
            r if r > 1_000 => None,
            r if r > 100 => Some(Duration::from_millis(100)),
            r if r > 20 => Some(Duration::from_millis(500)),
            _ => Some(Duration::from_secs(1)),
        }
    }
}
