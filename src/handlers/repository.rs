//! Repository metadata handlers

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::github::GithubError;
use crate::models::{ApiResponse, RepoRef, RepositoryInfo};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RepositoryQuery {
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryLookupRequest {
    pub repository_url: Option<String>,
}

/// GET /repository
///
/// Normalized metadata for a single repository.
pub async fn get_repository(
    state: web::Data<AppState>,
    query: web::Query<RepositoryQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let (owner, repo_name) = match (query.owner.as_deref(), query.repo.as_deref()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => (owner, repo),
        _ => {
            return Err(AppError::Validation(
                "Missing required parameters: owner and repo".to_string(),
            ));
        }
    };

    let repo = RepoRef::new(owner, repo_name);
    lookup(&state, &repo).await
}

/// POST /repository
///
/// Same lookup, addressed by a repository URL in the body.
pub async fn lookup_repository(
    state: web::Data<AppState>,
    body: web::Json<RepositoryLookupRequest>,
) -> Result<HttpResponse, AppError> {
    let url = body
        .into_inner()
        .repository_url
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("Repository URL is required".to_string()))?;

    let repo: RepoRef = url.parse().map_err(AppError::Validation)?;
    lookup(&state, &repo).await
}

async fn lookup(state: &AppState, repo: &RepoRef) -> Result<HttpResponse, AppError> {
    let source = state
        .source
        .as_ref()
        .ok_or_else(|| AppError::Configuration("GitHub token not configured".to_string()))?;

    let fetched = source
        .repository(repo)
        .await
        .map_err(|e| map_repository_error(repo, e))?;

    let response: ApiResponse<RepositoryInfo> = ApiResponse::ok(fetched.data);
    Ok(HttpResponse::Ok().json(response))
}

fn map_repository_error(repo: &RepoRef, error: GithubError) -> AppError {
    match error {
        GithubError::NotFound(_) => AppError::NotFound(format!("Repository not found: {repo}")),
        e => AppError::Internal(e.to_string()),
    }
}

/// Configure repository routes
pub fn configure_repository_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/repository")
            .route(web::get().to(get_repository))
            .route(web::post().to(lookup_repository)),
    );
}
