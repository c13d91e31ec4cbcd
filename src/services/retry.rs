//! Retry/Recovery Controller
//!
//! Classifies upstream failures and bounds recovery attempts. Counters are
//! session-scoped, not per-page, so total wall-clock cost stays bounded no
//! matter how many pages a session covers.

use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use crate::github::GithubError;

/// Session-total quota waits under `force_complete`
const MAX_QUOTA_RETRIES: u32 = 3;

/// Session-total retries for transient failures
const MAX_TRANSIENT_RETRIES: u32 = 3;

/// Fixed delay before retrying a transient failure
const TRANSIENT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Bounds on a quota-exhaustion wait
const QUOTA_WAIT_MIN: Duration = Duration::from_secs(60);
const QUOTA_WAIT_MAX: Duration = Duration::from_secs(300);

/// What the driver should do with a failed upstream call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Sleep, then repeat the same operation
    RetryAfter(Duration),
    /// Stop pagination, keep everything accumulated so far and flag the
    /// session as quota-limited
    Drain,
    /// The requested repository does not exist; end the session with a
    /// not-found outcome
    NotFound,
    /// Unrecoverable; end the session with this error
    Fatal(GithubError),
}

/// Failure classifier with session-scoped retry budgets
#[derive(Debug)]
pub struct RetryController {
    force_complete: bool,
    quota_retries: u32,
    transient_retries: u32,
}

impl RetryController {
    pub fn new(force_complete: bool) -> Self {
        Self {
            force_complete,
            quota_retries: 0,
            transient_retries: 0,
        }
    }

    /// Classify a failed page fetch. `first_page` distinguishes a missing
    /// repository from a page that vanished mid-session: the former is a
    /// not-found outcome, the latter is unexpected and fatal.
    pub fn decide(&mut self, error: GithubError, first_page: bool) -> RecoveryAction {
        match error {
            GithubError::NotFound(message) => {
                if first_page {
                    RecoveryAction::NotFound
                } else {
                    RecoveryAction::Fatal(GithubError::NotFound(message))
                }
            }
            GithubError::RateLimited { reset_at, message } => {
                if self.force_complete && self.quota_retries < MAX_QUOTA_RETRIES {
                    self.quota_retries += 1;
                    let until_reset = reset_at
                        .map(|r| (r - Utc::now()).to_std().unwrap_or_default())
                        .unwrap_or(QUOTA_WAIT_MIN);
                    let wait = until_reset.clamp(QUOTA_WAIT_MIN, QUOTA_WAIT_MAX);
                    warn!(
                        attempt = self.quota_retries,
                        wait_secs = wait.as_secs(),
                        "quota exhausted, waiting for reset before retrying"
                    );
                    RecoveryAction::RetryAfter(wait)
                } else {
                    warn!(%message, "quota exhausted, draining with partial roster");
                    RecoveryAction::Drain
                }
            }
            e if e.is_transient() => {
                if self.transient_retries < MAX_TRANSIENT_RETRIES {
                    self.transient_retries += 1;
                    warn!(attempt = self.transient_retries, error = %e, "transient upstream failure, retrying");
                    RecoveryAction::RetryAfter(TRANSIENT_RETRY_DELAY)
                } else {
                    RecoveryAction::Fatal(e)
                }
            }
            e => RecoveryAction::Fatal(e),
        }
    }
}
