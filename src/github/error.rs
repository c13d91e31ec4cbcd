//! Error taxonomy for the upstream API boundary
//!
//! Every upstream call returns one of these variants so callers dispatch on
//! kind instead of inspecting payloads or header fields.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Typed upstream failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GithubError {
    /// Quota exhausted (403/429); `reset_at` comes from the response
    /// trailers when present
    #[error("Upstream quota exhausted: {message}")]
    RateLimited {
        reset_at: Option<DateTime<Utc>>,
        message: String,
    },

    /// Resource does not exist (404)
    #[error("Upstream resource not found: {0}")]
    NotFound(String),

    /// Network-level failure (connect, timeout, broken transfer)
    #[error("Upstream transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected shape
    #[error("Upstream response decode error: {0}")]
    Decode(String),

    /// Any other non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
}

impl GithubError {
    /// Whether a bounded retry is worth attempting
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::RateLimited { .. } | Self::NotFound(_) | Self::Decode(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GithubError::Transport("connection reset".to_string()).is_transient());
        assert!(GithubError::Upstream {
            status: 502,
            message: "bad gateway".to_string()
        }
        .is_transient());

        assert!(!GithubError::Upstream {
            status: 422,
            message: "unprocessable".to_string()
        }
        .is_transient());
        assert!(!GithubError::NotFound("missing".to_string()).is_transient());
        assert!(!GithubError::RateLimited {
            reset_at: None,
            message: "slow down".to_string()
        }
        .is_transient());
        assert!(!GithubError::Decode("bad json".to_string()).is_transient());
    }
}
