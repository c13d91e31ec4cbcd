use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Application-level error type
#[derive(Debug)]
pub enum AppError {
    /// Missing or invalid request parameters
    Validation(String),
    /// Requested repository does not exist upstream
    NotFound(String),
    /// Required configuration (upstream credential) is absent
    Configuration(String),
    /// Unclassified fatal error
    Internal(String),
}

/// Failure envelope returned to callers; `success` is always false here so
/// consumers can branch on one field for both outcomes
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{msg}"),
            Self::NotFound(msg) => write!(f, "{msg}"),
            Self::Configuration(msg) => write!(f, "{msg}"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        match self {
            Self::Validation(_) => HttpResponse::BadRequest().json(body),
            Self::NotFound(_) => HttpResponse::NotFound().json(body),
            Self::Configuration(_) | Self::Internal(_) => {
                HttpResponse::InternalServerError().json(body)
            }
        }
    }
}

impl From<crate::services::roster::FetchError> for AppError {
    fn from(err: crate::services::roster::FetchError) -> Self {
        match err {
            crate::services::roster::FetchError::RepoNotFound(repo) => {
                Self::NotFound(format!("Repository not found: {repo}"))
            }
            crate::services::roster::FetchError::Upstream(e) => Self::Internal(e.to_string()),
        }
    }
}
